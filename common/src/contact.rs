use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{config::FormConfig, schedule::Scheduler};

// something@something.tld, no whitespace anywhere
pub const EMAIL_REGEX: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("email pattern is a valid regex"));

pub const ERROR_CLASS: &str = "field-error";
pub const SUCCESS_CLASS: &str = "form-success";

// the two ways a field can fail; both are shown inline under the field and never escape
// the form as errors
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum FieldError {
    #[error("This field is required")]
    RequiredMissing,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl FieldError {
    pub fn code(self) -> &'static str {
        match self {
            FieldError::RequiredMissing => "required-missing",
            FieldError::InvalidEmail => "invalid-email",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    TextArea,
}

impl From<&str> for FieldKind {
    fn from(kind: &str) -> FieldKind {
        match kind {
            "email" => FieldKind::Email,
            "textarea" => FieldKind::TextArea,
            _ => FieldKind::Text,
        }
    }
}

// border colour of a field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldState {
    Neutral,
    Valid,
    Invalid,
}

impl FieldState {
    pub fn border_color(self) -> &'static str {
        match self {
            FieldState::Neutral => "var(--border-color)",
            FieldState::Valid => "var(--success-color)",
            FieldState::Invalid => "var(--danger-color)",
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

// validation of a single value; surrounding whitespace never counts
pub fn validate_value(value: &str, kind: FieldKind, required: bool) -> Result<(), FieldError> {
    let value = value.trim();

    if required && value.is_empty() {
        return Err(FieldError::RequiredMissing);
    }

    if kind == FieldKind::Email && !value.is_empty() && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }

    Ok(())
}

// a form control as the validator sees it
pub trait FormField: Clone + 'static {
    fn name(&self) -> String;

    fn value(&self) -> String;

    fn kind(&self) -> FieldKind;

    fn is_required(&self) -> bool;

    // replace whatever inline message the field's group shows (at most one) and colour the
    // border to match
    fn show_error(&self, error: Option<FieldError>);

    // remove the inline message, if there is one, and return whether anything was removed
    fn clear_error(&self) -> bool;

    fn set_state(&self, state: FieldState);
}

// the form element itself
pub trait FormSurface: Clone + 'static {
    // prepend the success banner; the returned handle removes it again
    fn show_banner(&self, text: &str) -> Box<dyn FnOnce()>;

    // back to the markup's default values, including controls the validator never sees
    fn reset(&self);
}

// collected field values, in field name order; nameless controls are not submitted
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContactMessage {
    pub fields: BTreeMap<String, String>,
}

// whatever eventually carries a message off the page
//
// nothing actually transmits messages yet; the default sink only records them
pub trait MessageSink {
    fn deliver(&self, message: &ContactMessage);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn deliver(&self, message: &ContactMessage) {
        match serde_json::to_string(message) {
            Ok(json) => info!(message = %json, "form submitted"),
            Err(err) => info!(fields = message.fields.len(), "form submitted ({err})"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Sent(ContactMessage),
    Rejected(Vec<(String, FieldError)>),
}

pub struct ContactForm<F, B, M, S> {
    form: B,
    fields: Vec<F>,
    sink: M,
    scheduler: S,
    config: FormConfig,
}

impl<F, B, M, S> ContactForm<F, B, M, S>
where
    F: FormField,
    B: FormSurface,
    M: MessageSink,
    S: Scheduler,
{
    pub fn new(form: B, fields: Vec<F>, sink: M, scheduler: S, config: FormConfig) -> Self {
        ContactForm {
            form,
            fields,
            sink,
            scheduler,
            config,
        }
    }

    pub fn fields(&self) -> &[F] {
        &self.fields
    }

    // blur handler
    pub fn validate_field(&self, field: &F) -> Result<(), FieldError> {
        let result = validate_value(&field.value(), field.kind(), field.is_required());

        field.show_error(result.err());
        field.set_state(match result {
            Ok(()) => FieldState::Valid,
            Err(_) => FieldState::Invalid,
        });

        result
    }

    // input handler: drop a stale message without re-validating
    pub fn field_edited(&self, field: &F) {
        if field.clear_error() {
            field.set_state(FieldState::Neutral);
        }
    }

    #[instrument(skip(self))]
    pub fn submit(&self) -> SubmitOutcome {
        let mut errors = Vec::new();

        for field in &self.fields {
            if !field.is_required() && field.kind() != FieldKind::Email {
                continue;
            }

            if let Err(err) = self.validate_field(field) {
                errors.push((field.name(), err));
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "contact form rejected");
            return SubmitOutcome::Rejected(errors);
        }

        let message = ContactMessage {
            fields: self
                .fields
                .iter()
                .map(|f| (f.name(), f))
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, f)| (name, f.value().trim().to_owned()))
                .collect(),
        };

        let dismiss = self.form.show_banner(&self.config.banner_text);
        self.scheduler.set_timeout(self.config.banner_ms, dismiss);

        self.form.reset();

        self.sink.deliver(&message);
        SubmitOutcome::Sent(message)
    }
}
