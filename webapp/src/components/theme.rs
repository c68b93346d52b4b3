use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, instrument};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MediaQueryListEvent};

use folio_common::theme::{Theme, ThemeManager, ThemeSurface, transition_css};

use crate::{
    app::AppContext,
    common::{clear_style, listen, set_style, storage::LocalPreferenceStore, timer::TimerScheduler},
};

pub const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

pub type DomThemeManager = ThemeManager<LocalPreferenceStore, DomTheme, TimerScheduler>;

// the root element carries data-theme="dark" in dark mode and no attribute at all in light
// mode; the toggle button shows the icon for the theme it would switch to
#[derive(Clone)]
pub struct DomTheme {
    root: Option<Element>,
    body: Option<HtmlElement>,
    toggle: Option<Element>,
}

impl ThemeSurface for DomTheme {
    fn current(&self) -> Theme {
        match self.root.as_ref().and_then(|r| r.get_attribute("data-theme")) {
            Some(value) if value == "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn apply(&self, theme: Theme) {
        let Some(root) = &self.root else { return };

        let _ = match theme {
            Theme::Dark => root.set_attribute("data-theme", "dark"),
            Theme::Light => root.remove_attribute("data-theme"),
        };
    }

    fn update_toggle(&self, theme: Theme) {
        let Some(toggle) = &self.toggle else { return };

        // no icon means the markup is doing something custom; leave it alone
        if let Ok(Some(icon)) = toggle.query_selector("i") {
            icon.set_class_name(theme.icon_class());
            let _ = toggle.set_attribute("aria-label", theme.toggle_label());
        }
    }

    fn set_transition(&self, duration_ms: Option<u32>) {
        let Some(body) = &self.body else { return };

        match duration_ms {
            Some(ms) => set_style(body, "transition", &transition_css(ms)),
            None => clear_style(body, "transition"),
        }
    }
}

#[instrument(skip_all)]
pub fn setup_theme(ctx: &AppContext) -> Result<Rc<DomThemeManager>> {
    let surface = DomTheme {
        root: ctx.document.document_element(),
        body: ctx.document.body(),
        toggle: ctx.document.get_element_by_id("theme-toggle"),
    };

    let manager = Rc::new(ThemeManager::new(
        LocalPreferenceStore::new(&ctx.config.theme.storage_key),
        surface.clone(),
        ctx.scheduler.clone(),
        ctx.config.theme.transition_ms,
    ));

    if let Some(toggle) = &surface.toggle {
        let manager = manager.clone();
        listen(toggle, "click", move |_| {
            manager.toggle();
        })?;
    } else {
        debug!("no theme toggle on this page");
    }

    let Ok(Some(query)) = ctx.window.match_media(DARK_QUERY) else {
        // without media query support there is no system hint to follow
        manager.load_preference(false);
        return Ok(manager);
    };

    manager.load_preference(query.matches());

    {
        let manager = manager.clone();
        listen(&query, "change", move |event| {
            if let Some(event) = event.dyn_ref::<MediaQueryListEvent>() {
                manager.system_changed(event.matches());
            }
        })?;
    }

    Ok(manager)
}
