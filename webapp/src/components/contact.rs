use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, instrument, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use folio_common::contact::{
    ContactForm, ERROR_CLASS, FieldError, FieldKind, FieldState, FormField, FormSurface, LogSink,
    SUCCESS_CLASS, SubmitOutcome,
};

use crate::{
    app::AppContext,
    common::{JsResultExt, listen, query_within, set_style, timer::TimerScheduler},
};

pub type DomContactForm = ContactForm<DomField, DomForm, LogSink, TimerScheduler>;

const BUTTON_TYPES: [&str; 4] = ["submit", "button", "reset", "image"];

#[derive(Clone)]
pub enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

// an input or textarea plus the .form-group that holds its message
#[derive(Clone)]
pub struct DomField {
    document: Document,
    control: Control,
}

impl DomField {
    fn from_element(document: &Document, element: Element) -> Option<Self> {
        let control = match element.dyn_into::<HtmlInputElement>() {
            // buttons are not fields
            Ok(input) if BUTTON_TYPES.contains(&input.type_().as_str()) => return None,
            Ok(input) => Control::Input(input),
            Err(element) => Control::TextArea(element.dyn_into::<HtmlTextAreaElement>().ok()?),
        };

        Some(DomField {
            document: document.clone(),
            control,
        })
    }

    fn element(&self) -> &Element {
        match &self.control {
            Control::Input(input) => input,
            Control::TextArea(area) => area,
        }
    }

    fn group(&self) -> Option<Element> {
        self.element().closest(".form-group").ok().flatten()
    }

    fn existing_error(&self) -> Option<Element> {
        self.group()?
            .query_selector(&format!(".{ERROR_CLASS}"))
            .ok()
            .flatten()
    }

    fn append_error(&self, error: FieldError) -> Result<()> {
        let Some(group) = self.group() else {
            return Ok(());
        };

        let span = self.document.create_element("span").js_context("create span")?;
        span.set_class_name(ERROR_CLASS);
        span.set_text_content(Some(&error.to_string()));
        set_style(&span, "color", FieldState::Invalid.border_color());
        set_style(&span, "font-size", "0.875rem");
        set_style(&span, "margin-top", "0.25rem");

        group.append_child(&span).js_context("append error")?;
        Ok(())
    }
}

impl FormField for DomField {
    fn name(&self) -> String {
        match &self.control {
            Control::Input(input) => input.name(),
            Control::TextArea(area) => area.name(),
        }
    }

    fn value(&self) -> String {
        match &self.control {
            Control::Input(input) => input.value(),
            Control::TextArea(area) => area.value(),
        }
    }

    fn kind(&self) -> FieldKind {
        match &self.control {
            Control::Input(input) => FieldKind::from(input.type_().as_str()),
            Control::TextArea(_) => FieldKind::TextArea,
        }
    }

    fn is_required(&self) -> bool {
        match &self.control {
            Control::Input(input) => input.required(),
            Control::TextArea(area) => area.required(),
        }
    }

    fn show_error(&self, error: Option<FieldError>) {
        if let Some(existing) = self.existing_error() {
            existing.remove();
        }

        if let Some(error) = error {
            if let Err(err) = self.append_error(error) {
                warn!("failed to show field error: {err}");
            }
        }
    }

    fn clear_error(&self) -> bool {
        match self.existing_error() {
            Some(existing) => {
                existing.remove();
                true
            }
            None => false,
        }
    }

    fn set_state(&self, state: FieldState) {
        set_style(self.element(), "border-color", state.border_color());
    }
}

#[derive(Clone)]
pub struct DomForm {
    document: Document,
    form: HtmlFormElement,
}

impl DomForm {
    fn banner(&self, text: &str) -> Result<Element> {
        let banner = self.document.create_element("div").js_context("create banner")?;
        banner.set_class_name(SUCCESS_CLASS);
        banner.set_text_content(Some(text));

        for (property, value) in [
            ("background", "var(--success-color)"),
            ("color", "white"),
            ("padding", "1rem"),
            ("border-radius", "var(--radius-md)"),
            ("margin-bottom", "1rem"),
            ("text-align", "center"),
            ("animation", "slideInUp 0.5s ease-out"),
        ] {
            set_style(&banner, property, value);
        }

        self.form
            .insert_before(&banner, self.form.first_child().as_ref())
            .js_context("insert banner")?;

        Ok(banner)
    }
}

impl FormSurface for DomForm {
    fn show_banner(&self, text: &str) -> Box<dyn FnOnce()> {
        match self.banner(text) {
            Ok(banner) => Box::new(move || banner.remove()),
            Err(err) => {
                warn!("failed to show success banner: {err}");
                Box::new(|| ())
            }
        }
    }

    fn reset(&self) {
        self.form.reset();
    }
}

#[instrument(skip_all)]
pub fn setup_contact_form(ctx: &AppContext) -> Result<()> {
    let Some(form) = ctx
        .document
        .get_element_by_id("contact-form")
        .and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("no contact form on this page");
        return Ok(());
    };

    let fields: Vec<DomField> = query_within(&form, "input, textarea")
        .into_iter()
        .filter_map(|element| DomField::from_element(&ctx.document, element))
        .collect();

    let contact: Rc<DomContactForm> = Rc::new(ContactForm::new(
        DomForm {
            document: ctx.document.clone(),
            form: form.clone(),
        },
        fields,
        LogSink,
        ctx.scheduler.clone(),
        ctx.config.form.clone(),
    ));

    {
        let contact = contact.clone();
        listen(&form, "submit", move |event| {
            event.prevent_default();

            if let SubmitOutcome::Rejected(errors) = contact.submit() {
                debug!(
                    "contact form has errors: {}",
                    errors
                        .iter()
                        .map(|(name, err)| format!("{name}={}", err.code()))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        })?;
    }

    for field in contact.fields() {
        let element = field.element().clone();

        {
            let contact = contact.clone();
            let field = field.clone();
            listen(&element, "blur", move |_| {
                let _ = contact.validate_field(&field);
            })?;
        }
        {
            let contact = contact.clone();
            let field = field.clone();
            listen(&element, "input", move |_| contact.field_edited(&field))?;
        }
    }

    Ok(())
}
