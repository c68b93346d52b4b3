use std::rc::Rc;

use anyhow::Result;
use js_sys::{Array, Reflect};
use tracing::{debug, info, instrument};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use folio_common::reveal::{
    FLOW_SELECTOR, Intersection, MARKER_SELECTOR, ScrollReveal, SkillBars, SkillTarget,
    scroll_progress,
};

use crate::{
    app::AppContext,
    common::{DomNode, JsResultExt, inner_height, query_all},
};

pub fn has_intersection_observer(ctx: &AppContext) -> bool {
    Reflect::has(&ctx.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

// build an observer whose callback receives the decoded entries and returns the targets it
// is done with; those are unobserved before the callback returns
fn observer<F>(threshold: f64, root_margin: Option<&str>, mut handle: F) -> Result<IntersectionObserver>
where
    F: FnMut(Vec<(DomNode, IntersectionObserverEntry)>) -> Vec<DomNode> + 'static,
{
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let entries = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| (DomNode(entry.target()), entry))
                .collect();

            for done in handle(entries) {
                observer.unobserve(done.element());
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .js_context("IntersectionObserver")?;

    callback.forget();
    Ok(observer)
}

#[instrument(skip_all)]
pub fn setup_scroll_reveal(ctx: &AppContext) -> Result<()> {
    let reveal = Rc::new(ScrollReveal::new(ctx.scheduler.clone(), ctx.config.reveal.clone()));
    let targets: Vec<DomNode> = query_all(&ctx.document, MARKER_SELECTOR)
        .into_iter()
        .map(DomNode)
        .collect();

    if !has_intersection_observer(ctx) {
        info!("IntersectionObserver unavailable, revealing immediately");
        reveal.reveal_all(&targets);
        return Ok(());
    }

    let config = reveal.config().clone();

    let main = {
        let reveal = reveal.clone();
        observer(config.threshold, Some(config.root_margin.as_str()), move |entries| {
            reveal.handle_entries(
                entries
                    .into_iter()
                    .map(|(target, entry)| Intersection {
                        target,
                        is_intersecting: entry.is_intersecting(),
                        progress: 0.0,
                    })
                    .collect(),
            )
        })?
    };

    for target in &targets {
        main.observe(target.element());
    }
    debug!(count = targets.len(), "observing reveal targets");

    let window = ctx.window.clone();
    let flow = observer(
        config.flow_threshold,
        Some(config.flow_root_margin.as_str()),
        move |entries| {
            let viewport = inner_height(&window);

            reveal.handle_flowing(
                entries
                    .into_iter()
                    .map(|(target, entry)| {
                        let top = target.element().get_bounding_client_rect().top();
                        Intersection {
                            target,
                            is_intersecting: entry.is_intersecting(),
                            progress: scroll_progress(top, viewport),
                        }
                    })
                    .collect(),
            )
        },
    )?;

    for target in query_all(&ctx.document, FLOW_SELECTOR) {
        flow.observe(&target);
    }

    Ok(())
}

#[instrument(skip_all)]
pub fn setup_skill_bars(ctx: &AppContext) -> Result<()> {
    let bars = query_all(&ctx.document, ".skill-progress");
    if bars.is_empty() {
        return Ok(());
    }

    if !has_intersection_observer(ctx) {
        // nothing will ever report them visible, so grow them straight away
        for bar in bars.into_iter().map(DomNode) {
            if let Some(width) = bar.target_width() {
                bar.set_width(&width);
            }
        }
        return Ok(());
    }

    let skills = SkillBars::new(ctx.scheduler.clone(), ctx.config.skills.clone());
    let threshold = skills.config().threshold;

    let watcher = observer(threshold, None, move |entries| {
        skills.handle_entries(
            entries
                .into_iter()
                .map(|(target, entry)| Intersection {
                    target,
                    is_intersecting: entry.is_intersecting(),
                    progress: 0.0,
                })
                .collect(),
        )
    })?;

    for bar in &bars {
        watcher.observe(bar);
    }
    debug!(count = bars.len(), "observing skill bars");

    Ok(())
}
