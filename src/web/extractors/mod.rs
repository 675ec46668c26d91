//! Custom extractors.

mod account_id;
mod validated_form;

pub use account_id::AccountId;
pub use validated_form::ValidatedForm;
