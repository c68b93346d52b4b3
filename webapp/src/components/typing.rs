use anyhow::Result;
use tracing::{debug, instrument};

use folio_common::typing::{CycleTiming, Typewriter, start_cycle, start_reveal};

use crate::{app::AppContext, common::query_all};

pub const TYPED_SELECTOR: &str = ".typed-text";

// portfolio: take over the headline that lists the default role and cycle through the
// configured phrases
#[instrument(skip_all)]
pub fn setup_typing_cycle(ctx: &AppContext) -> Result<()> {
    let config = &ctx.config.typing;

    for element in query_all(&ctx.document, TYPED_SELECTOR) {
        let text = element.text_content().unwrap_or_default();
        if !text.contains(&config.trigger) {
            continue;
        }

        let Some(machine) = Typewriter::new(&config.phrases, CycleTiming::from(config)) else {
            debug!("no phrases to cycle through");
            return Ok(());
        };

        start_cycle(ctx.scheduler.clone(), machine, move |text| {
            element.set_text_content(Some(text))
        });
    }

    Ok(())
}

// resume: type out whatever the markup holds, once
#[instrument(skip_all)]
pub fn setup_typing_reveal(ctx: &AppContext) -> Result<()> {
    let interval = ctx.config.typing.reveal_interval_ms;

    for element in query_all(&ctx.document, TYPED_SELECTOR) {
        let text = element.text_content().unwrap_or_default();

        start_reveal(ctx.scheduler.clone(), &text, interval, move |shown| {
            element.set_text_content(Some(shown))
        });
    }

    Ok(())
}
