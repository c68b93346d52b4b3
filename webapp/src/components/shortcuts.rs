use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, instrument};
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use folio_common::shortcuts::{KeyPress, Shortcut};

use crate::{
    app::AppContext,
    common::listen,
    components::{
        print::{SharedPrintMode, print_page},
        theme::DomThemeManager,
    },
};

#[instrument(skip_all)]
pub fn setup_shortcuts(
    ctx: &AppContext,
    theme: Rc<DomThemeManager>,
    print: Option<SharedPrintMode>,
) -> Result<()> {
    let window = ctx.window.clone();

    listen(&ctx.document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };

        let key = event.key();
        let press = KeyPress {
            key: &key,
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            shift: event.shift_key(),
        };

        match press.shortcut() {
            Some(Shortcut::Print) => {
                event.prevent_default();
                match &print {
                    Some(mode) => print_page(mode),
                    // pages without print mode still get the dialog
                    None => {
                        let _ = window.print();
                    }
                }
            }
            Some(Shortcut::ToggleTheme) => {
                event.prevent_default();
                theme.toggle();
            }
            None => (),
        }
    })?;

    debug!("keyboard shortcuts installed");
    Ok(())
}
