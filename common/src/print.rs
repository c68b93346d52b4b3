use tracing::debug;

pub const PRINT_CLASS: &str = "print-mode";

// what print preparation touches in the document
pub trait PrintSurface {
    fn set_print_class(&self, enabled: bool);

    fn set_controls_hidden(&self, hidden: bool);

    // page-break-inside: avoid on every content section
    fn set_sections_unbreakable(&self, unbreakable: bool);

    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, y: f64);

    // blocks until the dialog closes in every browser that matters
    fn open_print_dialog(&self);
}

// print mode
//
// the explicit print action and the print media query both drive the same two transitions,
// so each transition is a no-op when the layout is already in the requested state
pub struct PrintMode<P> {
    surface: P,
    active: bool,
}

impl<P: PrintSurface> PrintMode<P> {
    pub fn new(surface: P) -> Self {
        PrintMode {
            surface,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn prepare(&mut self) -> bool {
        if self.active {
            return false;
        }

        debug!("preparing print layout");
        self.surface.set_print_class(true);
        self.surface.set_controls_hidden(true);
        self.surface.set_sections_unbreakable(true);
        self.active = true;
        true
    }

    pub fn restore(&mut self) -> bool {
        if !self.active {
            return false;
        }

        debug!("restoring screen layout");
        self.surface.set_print_class(false);
        self.surface.set_controls_hidden(false);
        self.surface.set_sections_unbreakable(false);
        self.active = false;
        true
    }

    // print media query listener
    pub fn media_changed(&mut self, printing: bool) -> bool {
        if printing { self.prepare() } else { self.restore() }
    }

    // print button / keyboard shortcut
    pub fn print(&mut self) {
        let scroll = self.surface.scroll_y();

        self.prepare();
        self.surface.open_print_dialog();
        self.restore();

        self.surface.scroll_to(scroll);
    }
}
