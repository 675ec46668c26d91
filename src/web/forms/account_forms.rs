//! Public account forms.

use serde::Deserialize;
use validator::Validate;

use super::{check_passwords_match, FieldKind, FieldSpec, HtmlForm};
use crate::domain::validation::{
    validate_email_address, validate_first_name, validate_last_name, validate_password_strength,
    validate_required, validate_username,
};
use crate::domain::{AccountDraft, RoleFlags};
use crate::types::FieldErrors;

/// Self-service registration.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password_strength"))]
    pub password1: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub password2: String,
}

impl SignupForm {
    /// Normalized registration data; new members are active, without staff rights.
    pub fn into_draft(self) -> AccountDraft {
        AccountDraft {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password1,
            roles: RoleFlags::member(),
        }
    }
}

impl HtmlForm for SignupForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("username", "Username", FieldKind::Text),
        FieldSpec::new("first_name", "First Name", FieldKind::Text),
        FieldSpec::new("last_name", "Last Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Email),
        FieldSpec::new("password1", "Password", FieldKind::Password),
        FieldSpec::new("password2", "Password confirmation", FieldKind::Password),
    ];

    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    fn text_value(&self, field: &str) -> &str {
        match field {
            "username" => &self.username,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            _ => "",
        }
    }

    fn clean(&self, errors: &mut FieldErrors) {
        check_passwords_match(&self.password1, &self.password2, errors);
    }
}

/// Username/password login, shared by the public and control panel pages.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
}

impl HtmlForm for LoginForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("username", "Username", FieldKind::Text),
        FieldSpec::new("password", "Password", FieldKind::Password),
    ];

    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    fn text_value(&self, field: &str) -> &str {
        match field {
            "username" => &self.username,
            _ => "",
        }
    }
}

/// Body of POST-only actions such as logout and delete.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

impl HtmlForm for CsrfForm {
    const FIELDS: &'static [FieldSpec] = &[];

    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}
