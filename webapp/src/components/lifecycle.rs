use anyhow::Result;
use tracing::{debug, instrument};
use web_sys::HtmlImageElement;

use crate::{
    app::AppContext,
    common::{listen, local_date, query_all, set_class},
};

#[instrument(skip_all)]
pub fn setup_last_updated(ctx: &AppContext) -> Result<()> {
    if let Some(element) = ctx.document.get_element_by_id("last-updated") {
        element.set_text_content(Some(&local_date()));
    }

    Ok(())
}

// once every resource is in, mark the body and warm the image cache
#[instrument(skip_all)]
pub fn setup_load_finisher(ctx: &AppContext) -> Result<()> {
    let document = ctx.document.clone();

    listen(&ctx.window, "load", move |_| {
        if let Some(body) = document.body() {
            set_class(&body, "loaded", true);
        }

        let mut preloaded = 0;
        for image in query_all(&document, "img") {
            let Some(src) = image.get_attribute("src") else {
                continue;
            };
            if src.is_empty() || src.starts_with("data:") {
                continue;
            }

            if let Ok(preload) = HtmlImageElement::new() {
                preload.set_src(&src);
                preloaded += 1;
            }
        }

        debug!(preloaded, "page fully loaded");
    })
}
