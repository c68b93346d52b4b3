use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, instrument};

use folio_common::filter::{FilterButton, FilterKey, ProjectFilter};

use crate::{
    app::AppContext,
    common::{DomNode, listen, query_all, timer::TimerScheduler},
};

pub type DomProjectFilter = ProjectFilter<DomNode, DomNode, TimerScheduler>;

#[instrument(skip_all)]
pub fn setup_project_filter(ctx: &AppContext) -> Result<()> {
    let buttons: Vec<DomNode> = query_all(&ctx.document, ".filter-btn")
        .into_iter()
        .map(DomNode)
        .collect();

    if buttons.is_empty() {
        debug!("no filter buttons on this page");
        return Ok(());
    }

    let cards = query_all(&ctx.document, ".project-card")
        .into_iter()
        .map(DomNode)
        .collect();

    let filter: Rc<DomProjectFilter> = Rc::new(ProjectFilter::new(
        cards,
        buttons,
        ctx.scheduler.clone(),
        ctx.config.filter.clone(),
    ));

    for button in filter.buttons() {
        let Some(key) = button.filter_key() else {
            continue;
        };

        let filter = filter.clone();
        listen(button.element(), "click", move |_| {
            filter.apply(FilterKey::from(key.as_str()));
        })?;
    }

    Ok(())
}
