//! HTML form definitions.
//!
//! Each form is a serde + validator struct deserialized from an urlencoded
//! body. Per-field rules come from `validator` attributes; cross-field rules
//! run in [`HtmlForm::clean`]. Field metadata drives rendering.

mod account_forms;
mod admin_forms;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::Validate;

use crate::types::FieldErrors;

pub use account_forms::{CsrfForm, LoginForm, SignupForm};
pub use admin_forms::{AdminCreateForm, AdminEditForm};

/// Error shown when the confirmation password differs.
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";

/// Input widget of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Checkbox,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// Presentation style (CSS class and placeholder) of a form's widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTheme {
    /// Public signup and login: `Enter Your {Label}`
    Account,
    /// Control panel login: `Admin {Label}`
    AdminLogin,
    /// Control panel create/edit: `Enter {Label}`, checkboxes unstyled
    Admin,
}

impl FormTheme {
    pub fn css_class(&self, kind: FieldKind) -> &'static str {
        match (self, kind) {
            (FormTheme::Admin, FieldKind::Checkbox) => "form-check-input",
            _ => "form-control",
        }
    }

    pub fn placeholder(&self, field: &FieldSpec) -> Option<String> {
        match (self, field.kind) {
            (_, FieldKind::Checkbox) => None,
            (FormTheme::Account, _) => Some(format!("Enter Your {}", field.label)),
            (FormTheme::AdminLogin, _) => Some(format!("Admin {}", field.label)),
            (FormTheme::Admin, _) => Some(format!("Enter {}", field.label)),
        }
    }
}

/// A submitted HTML form.
pub trait HtmlForm: DeserializeOwned + Validate + Send + 'static {
    /// Fields in display order.
    const FIELDS: &'static [FieldSpec];

    /// CSRF token carried by the submission.
    fn csrf_token(&self) -> &str;

    /// Submitted text value, echoed back when the form is re-rendered.
    fn text_value(&self, _field: &str) -> &str {
        ""
    }

    fn is_checked(&self, _field: &str) -> bool {
        false
    }

    /// Cross-field checks, run after per-field validation.
    fn clean(&self, _errors: &mut FieldErrors) {}
}

/// Checkbox semantics: present with a truthy value means checked.
pub(crate) fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    ))
}

/// Shared password confirmation check.
pub(crate) fn check_passwords_match(password1: &str, password2: &str, errors: &mut FieldErrors) {
    if !password1.is_empty() && !password2.is_empty() && password1 != password2 {
        errors.add("password2", PASSWORD_MISMATCH);
    }
}
