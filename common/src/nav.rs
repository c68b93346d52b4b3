use tracing::trace;

use crate::config::NavConfig;

pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";

// vertical extent of a section[id], in document coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

// which section the nav should highlight
//
// sections are checked in document order and the last one containing the probe point wins.
// `None` means nothing matched, in which case the links keep whatever state they had
pub fn active_section<'a>(
    sections: &'a [SectionSpan],
    scroll_y: f64,
    config: &NavConfig,
) -> Option<&'a str> {
    let probe = scroll_y + config.section_offset;
    trace!(probe, "locating active section");

    sections
        .iter()
        .rev()
        .find(|section| section.contains(probe))
        .map(|section| section.id.as_str())
}

pub fn link_targets(href: Option<&str>, section_id: &str) -> bool {
    href.and_then(|h| h.strip_prefix('#')) == Some(section_id)
}

pub fn is_scrolled(scroll_y: f64, config: &NavConfig) -> bool {
    scroll_y > config.scrolled_threshold
}

// the mobile menu only makes sense below the breakpoint
pub fn should_collapse_menu(viewport_width: f64, config: &NavConfig) -> bool {
    viewport_width > config.mobile_breakpoint
}

// where to scroll for an in-page anchor so the fixed nav does not cover the target
pub fn anchor_scroll_target(element_top: f64, nav_height: Option<f64>) -> f64 {
    element_top - nav_height.unwrap_or(0.0)
}

// hero translation for the parallax effect; once the hero has scrolled out of view it is
// left where it was
pub fn parallax_offset(scroll_y: f64, hero_height: f64, config: &NavConfig) -> Option<f64> {
    if scroll_y < hero_height {
        Some(scroll_y * config.parallax_rate)
    } else {
        None
    }
}

// mobile menu
//
// toggling flips both the toggle button and the menu; a click that lands outside both of
// them closes an open menu
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    // returns true when the menu actually closed
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn outside_click(&mut self, inside_menu: bool, inside_toggle: bool) -> bool {
        if inside_menu || inside_toggle {
            return false;
        }

        self.close()
    }
}
