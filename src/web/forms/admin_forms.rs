//! Control panel account forms.

use serde::Deserialize;
use validator::Validate;

use super::{check_passwords_match, checkbox, FieldKind, FieldSpec, HtmlForm};
use crate::domain::validation::{
    validate_email_address, validate_first_name, validate_last_name, validate_password_strength,
    validate_required, validate_username,
};
use crate::domain::{Account, AccountChanges, AccountDraft, RoleFlags};
use crate::types::FieldErrors;

const ROLE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("is_active", "Active", FieldKind::Checkbox),
    FieldSpec::new("is_staff", "Staff status", FieldKind::Checkbox),
    FieldSpec::new("is_superuser", "Superuser status", FieldKind::Checkbox),
];

/// Account creation with explicit role flags.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminCreateForm {
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
    #[serde(default, deserialize_with = "checkbox")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub is_staff: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub is_superuser: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_password_strength"))]
    pub password1: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub password2: String,
}

impl AdminCreateForm {
    /// Blank form as first shown: new accounts start active.
    pub fn initial() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    fn roles(&self) -> RoleFlags {
        RoleFlags {
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }

    pub fn into_draft(self) -> AccountDraft {
        let roles = self.roles();
        AccountDraft {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password1,
            roles,
        }
    }
}

impl HtmlForm for AdminCreateForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("username", "Username", FieldKind::Text),
        FieldSpec::new("first_name", "First Name", FieldKind::Text),
        FieldSpec::new("last_name", "Last Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Email),
        ROLE_FIELDS[0],
        ROLE_FIELDS[1],
        ROLE_FIELDS[2],
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

    fn is_checked(&self, field: &str) -> bool {
        match field {
            "is_active" => self.is_active,
            "is_staff" => self.is_staff,
            "is_superuser" => self.is_superuser,
            _ => false,
        }
    }

    fn clean(&self, errors: &mut FieldErrors) {
        check_passwords_match(&self.password1, &self.password2, errors);
    }
}

/// Profile and role edit of an existing account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdminEditForm {
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
    #[serde(default, deserialize_with = "checkbox")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub is_staff: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub is_superuser: bool,
}

impl AdminEditForm {
    /// Form pre-filled with the account's current values.
    pub fn from_account(account: &Account) -> Self {
        Self {
            csrf_token: String::new(),
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
        }
    }

    pub fn into_changes(self) -> AccountChanges {
        AccountChanges {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            roles: RoleFlags {
                is_active: self.is_active,
                is_staff: self.is_staff,
                is_superuser: self.is_superuser,
            },
        }
    }
}

impl HtmlForm for AdminEditForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("username", "Username", FieldKind::Text),
        FieldSpec::new("first_name", "First Name", FieldKind::Text),
        FieldSpec::new("last_name", "Last Name", FieldKind::Text),
        FieldSpec::new("email", "Email", FieldKind::Email),
        ROLE_FIELDS[0],
        ROLE_FIELDS[1],
        ROLE_FIELDS[2],
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

    fn is_checked(&self, field: &str) -> bool {
        match field {
            "is_active" => self.is_active,
            "is_staff" => self.is_staff,
            "is_superuser" => self.is_superuser,
            _ => false,
        }
    }
}
