use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schedule::Scheduler;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_system(prefers_dark: bool) -> Theme {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    // the toggle always offers the *other* theme
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Dark => "fas fa-sun",
            Theme::Light => "fas fa-moon",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light mode",
            Theme::Light => "Switch to dark mode",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(anyhow::Error::msg(format!("unknown theme {other:?}"))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// body transition while the colours swap
pub fn transition_css(duration_ms: u32) -> String {
    format!("all {duration_ms}ms ease")
}

// the persisted user choice
//
// implementations swallow their own failures; a broken store behaves like an empty one
pub trait PreferenceStore {
    fn load(&self) -> Option<Theme>;

    fn save(&self, theme: Theme);
}

// everything the theme manager touches in the document
pub trait ThemeSurface {
    // theme currently rendered, as read back from the root element
    fn current(&self) -> Theme;

    fn apply(&self, theme: Theme);

    fn update_toggle(&self, theme: Theme);

    // Some(duration) while a toggle is animating, None once it has settled
    fn set_transition(&self, duration_ms: Option<u32>);
}

pub struct ThemeManager<P, T, S> {
    store: P,
    surface: T,
    scheduler: S,
    transition_ms: u32,
}

impl<P, T, S> ThemeManager<P, T, S>
where
    P: PreferenceStore,
    T: ThemeSurface + Clone + 'static,
    S: Scheduler,
{
    pub fn new(store: P, surface: T, scheduler: S, transition_ms: u32) -> Self {
        ThemeManager {
            store,
            surface,
            scheduler,
            transition_ms,
        }
    }

    // stored preference wins; otherwise follow the operating system
    pub fn resolve(&self, prefers_dark: bool) -> Theme {
        self.store
            .load()
            .unwrap_or_else(|| Theme::from_system(prefers_dark))
    }

    pub fn load_preference(&self, prefers_dark: bool) -> Theme {
        let theme = self.resolve(prefers_dark);
        debug!(theme = theme.as_str(), "applying initial theme");

        self.surface.apply(theme);
        self.surface.update_toggle(theme);
        theme
    }

    pub fn toggle(&self) -> Theme {
        let theme = self.surface.current().toggled();
        info!(theme = theme.as_str(), "theme toggled");

        self.surface.apply(theme);
        self.store.save(theme);
        self.surface.update_toggle(theme);

        self.surface.set_transition(Some(self.transition_ms));
        let surface = self.surface.clone();
        self.scheduler.set_timeout(
            self.transition_ms,
            Box::new(move || surface.set_transition(None)),
        );

        theme
    }

    // called from the prefers-color-scheme change listener
    //
    // an explicit choice always outranks the system hint, so this only does anything while
    // the store is empty.  returns the applied theme, if any
    pub fn system_changed(&self, prefers_dark: bool) -> Option<Theme> {
        if self.store.load().is_some() {
            return None;
        }

        let theme = Theme::from_system(prefers_dark);
        debug!(theme = theme.as_str(), "following system theme");

        self.surface.apply(theme);
        self.surface.update_toggle(theme);
        Some(theme)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::schedule::ManualScheduler;

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<RefCell<Option<Theme>>>);

    impl PreferenceStore for MemoryStore {
        fn load(&self) -> Option<Theme> {
            *self.0.borrow()
        }

        fn save(&self, theme: Theme) {
            *self.0.borrow_mut() = Some(theme);
        }
    }

    #[derive(Default)]
    struct Page {
        // mirrors the data-theme attribute: present only when dark
        data_theme: Option<&'static str>,
        icon: &'static str,
        label: &'static str,
        transition: Option<u32>,
    }

    #[derive(Clone, Default)]
    struct FakeSurface(Rc<RefCell<Page>>);

    impl ThemeSurface for FakeSurface {
        fn current(&self) -> Theme {
            match self.0.borrow().data_theme {
                Some("dark") => Theme::Dark,
                _ => Theme::Light,
            }
        }

        fn apply(&self, theme: Theme) {
            self.0.borrow_mut().data_theme = match theme {
                Theme::Dark => Some("dark"),
                Theme::Light => None,
            };
        }

        fn update_toggle(&self, theme: Theme) {
            let mut page = self.0.borrow_mut();
            page.icon = theme.icon_class();
            page.label = theme.toggle_label();
        }

        fn set_transition(&self, duration_ms: Option<u32>) {
            self.0.borrow_mut().transition = duration_ms;
        }
    }

    fn manager() -> (
        MemoryStore,
        FakeSurface,
        ManualScheduler,
        ThemeManager<MemoryStore, FakeSurface, ManualScheduler>,
    ) {
        let store = MemoryStore::default();
        let surface = FakeSurface::default();
        let scheduler = ManualScheduler::new();
        let manager = ThemeManager::new(store.clone(), surface.clone(), scheduler.clone(), 300);
        (store, surface, scheduler, manager)
    }

    #[test]
    fn system_dark_hint_applies_when_nothing_is_stored() {
        let (store, surface, _, manager) = manager();

        assert_eq!(manager.load_preference(true), Theme::Dark);
        assert_eq!(surface.0.borrow().data_theme, Some("dark"));
        assert_eq!(surface.0.borrow().icon, "fas fa-sun");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn stored_preference_beats_system_hint() {
        let (store, surface, _, manager) = manager();
        store.save(Theme::Light);

        assert_eq!(manager.load_preference(true), Theme::Light);
        assert_eq!(surface.0.borrow().data_theme, None);
        assert_eq!(surface.0.borrow().label, "Switch to dark mode");
    }

    #[test]
    fn toggle_persists_and_round_trips() {
        let (store, surface, scheduler, manager) = manager();
        manager.load_preference(true);

        assert_eq!(manager.toggle(), Theme::Light);
        assert_eq!(store.load(), Some(Theme::Light));
        assert_eq!(surface.0.borrow().transition, Some(300));

        scheduler.advance(300);
        assert_eq!(surface.0.borrow().transition, None);

        assert_eq!(manager.toggle(), Theme::Dark);
        assert_eq!(store.load(), Some(Theme::Dark));
        assert_eq!(surface.0.borrow().data_theme, Some("dark"));
        assert_eq!(surface.0.borrow().label, "Switch to light mode");
    }

    #[test]
    fn system_changes_are_ignored_once_the_user_chose() {
        let (store, surface, _, manager) = manager();
        manager.load_preference(false);

        assert_eq!(manager.system_changed(true), Some(Theme::Dark));
        assert_eq!(surface.0.borrow().data_theme, Some("dark"));

        store.save(Theme::Light);
        assert_eq!(manager.system_changed(true), None);
    }

    #[test]
    fn transition_follows_the_configured_duration() {
        let store = MemoryStore::default();
        let surface = FakeSurface::default();
        let scheduler = ManualScheduler::new();
        let manager = ThemeManager::new(store, surface.clone(), scheduler.clone(), 750);

        manager.toggle();
        assert_eq!(surface.0.borrow().transition, Some(750));

        scheduler.advance(749);
        assert_eq!(surface.0.borrow().transition, Some(750));
        scheduler.advance(1);
        assert_eq!(surface.0.borrow().transition, None);

        assert_eq!(transition_css(300), "all 300ms ease");
        assert_eq!(transition_css(750), "all 750ms ease");
    }

    #[test]
    fn theme_parsing() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light\n".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
