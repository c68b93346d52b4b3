use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};
use web_sys::{Document, Window};

use folio_common::{PageKind, SiteConfig, read_config};

use crate::{
    common::{listen, timer::TimerScheduler},
    components::{
        analytics::setup_analytics,
        contact::setup_contact_form,
        filter::setup_project_filter,
        lifecycle::{setup_last_updated, setup_load_finisher},
        navigation::setup_navigation,
        print::setup_print_mode,
        reveal::{setup_scroll_reveal, setup_skill_bars},
        shortcuts::setup_shortcuts,
        theme::setup_theme,
        typing::{setup_typing_cycle, setup_typing_reveal},
    },
};

const SITE_CONFIG: &str = include_str!("../site.toml");

// document.readyState is a plain string: "loading", "interactive" or "complete"
fn still_parsing(ready_state: &str) -> bool {
    ready_state == "loading"
}

// everything a feature needs to find its markup and schedule its work
#[derive(Clone)]
pub struct AppContext {
    pub window: Window,
    pub document: Document,
    pub config: Rc<SiteConfig>,
    pub scheduler: TimerScheduler,
    pub page: PageKind,
}

impl AppContext {
    fn new(window: Window, document: Document) -> Self {
        let config = match read_config(SITE_CONFIG) {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to parse site config, using defaults: {err}");
                SiteConfig::default()
            }
        };

        // needs the parsed body, so only once the document is ready
        let page = PageKind::from(
            document
                .body()
                .and_then(|body| body.get_attribute("data-page"))
                .as_deref(),
        );

        AppContext {
            window,
            document,
            config: Rc::new(config),
            scheduler: TimerScheduler::new(),
            page,
        }
    }
}

// a missing element or a refused listener only costs that one feature
fn optional<T>(feature: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{feature} unavailable: {err}");
            None
        }
    }
}

pub struct PageController {
    ctx: AppContext,
}

impl PageController {
    pub fn new(ctx: AppContext) -> Self {
        PageController { ctx }
    }

    #[instrument(skip_all, fields(page = ?self.ctx.page))]
    pub fn initialize(&self) -> Result<()> {
        let ctx = &self.ctx;
        let page = ctx.page;

        // the theme goes first so that nothing else paints in the wrong colours
        let theme = setup_theme(ctx)?;

        optional("navigation", setup_navigation(ctx));
        optional("scroll reveal", setup_scroll_reveal(ctx));

        if page.cycles_typing() {
            optional("typing effect", setup_typing_cycle(ctx));
        } else {
            optional("typing reveal", setup_typing_reveal(ctx));
        }

        if page.has_project_filter() {
            optional("project filter", setup_project_filter(ctx));
        }

        if page.has_skill_bars() {
            optional("skill bars", setup_skill_bars(ctx));
        }

        if page.has_contact_form() {
            optional("contact form", setup_contact_form(ctx));
        }

        let print = if page.has_print_mode() {
            optional("print mode", setup_print_mode(ctx))
        } else {
            None
        };

        if page.has_last_updated() {
            optional("last updated", setup_last_updated(ctx));
        }

        optional("keyboard shortcuts", setup_shortcuts(ctx, theme, print));
        optional("analytics", setup_analytics(ctx));
        optional("load handler", setup_load_finisher(ctx));

        info!("page initialized");
        Ok(())
    }
}

fn start(window: Window, document: Document) {
    let ctx = AppContext::new(window, document);

    if let Err(err) = PageController::new(ctx).initialize() {
        warn!("failed to initialize page: {err}");
    }
}

fn documents() -> Result<(Window, Document)> {
    let window = web_sys::window().context("no global window")?;
    let document = window.document().context("window has no document")?;
    Ok((window, document))
}

pub fn launch() {
    let (window, document) = match documents() {
        Ok(found) => found,
        Err(err) => {
            warn!("no document to enhance: {err}");
            return;
        }
    };

    // the bundle may be loaded before the markup has been parsed
    if still_parsing(&document.ready_state()) {
        debug!("waiting for DOMContentLoaded");

        let target = document.clone();
        let mut pending = Some((window, document));
        let result = listen(&target, "DOMContentLoaded", move |_| {
            if let Some((window, document)) = pending.take() {
                start(window, document);
            }
        });

        if let Err(err) = result {
            warn!("failed to wait for the document: {err}");
        }
    } else {
        start(window, document);
    }
}
