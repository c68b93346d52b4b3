use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use tracing::{debug, instrument, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, MediaQueryListEvent, Window};

use folio_common::print::{PRINT_CLASS, PrintMode, PrintSurface};

use crate::{
    app::AppContext,
    common::{clear_style, listen, query_all, scroll_y, set_class, set_style},
};

pub const PRINT_QUERY: &str = "print";

pub type SharedPrintMode = Rc<RefCell<PrintMode<DomPrint>>>;

#[derive(Clone)]
pub struct DomPrint {
    window: Window,
    document: Document,
    hidden_controls: Vec<String>,
}

impl PrintSurface for DomPrint {
    fn set_print_class(&self, enabled: bool) {
        if let Some(body) = self.document.body() {
            set_class(&body, PRINT_CLASS, enabled);
        }
    }

    fn set_controls_hidden(&self, hidden: bool) {
        for selector in &self.hidden_controls {
            for control in query_all(&self.document, selector) {
                if hidden {
                    set_style(&control, "display", "none");
                } else {
                    clear_style(&control, "display");
                }
            }
        }
    }

    fn set_sections_unbreakable(&self, unbreakable: bool) {
        for section in query_all(&self.document, "section") {
            if unbreakable {
                set_style(&section, "page-break-inside", "avoid");
            } else {
                clear_style(&section, "page-break-inside");
            }
        }
    }

    fn scroll_y(&self) -> f64 {
        scroll_y(&self.window)
    }

    fn scroll_to(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn open_print_dialog(&self) {
        if let Err(err) = self.window.print() {
            warn!("print dialog failed: {err:?}");
        }
    }
}

// explicit print action, shared by the print button and the keyboard shortcut
pub fn print_page(mode: &SharedPrintMode) {
    match mode.try_borrow_mut() {
        Ok(mut mode) => mode.print(),
        Err(_) => debug!("print already in progress"),
    }
}

#[instrument(skip_all)]
pub fn setup_print_mode(ctx: &AppContext) -> Result<SharedPrintMode> {
    let mode: SharedPrintMode = Rc::new(RefCell::new(PrintMode::new(DomPrint {
        window: ctx.window.clone(),
        document: ctx.document.clone(),
        hidden_controls: ctx.config.print.hidden_controls.clone(),
    })));

    if let Some(button) = ctx.document.get_element_by_id("print-btn") {
        let mode = mode.clone();
        listen(&button, "click", move |_| print_page(&mode))?;
    }

    // the media query also fires while print() itself is running, in which case the
    // explicit action already owns the layout
    if let Ok(Some(query)) = ctx.window.match_media(PRINT_QUERY) {
        let mode = mode.clone();
        listen(&query, "change", move |event| {
            let Some(event) = event.dyn_ref::<MediaQueryListEvent>() else {
                return;
            };

            if let Ok(mut mode) = mode.try_borrow_mut() {
                mode.media_changed(event.matches());
            }
        })?;
    }

    Ok(mode)
}
