//! Shared types used across layers.

mod directory;
mod field_errors;
mod pagination;

pub use directory::{DirectoryQuery, SortColumn, SortKey};
pub use field_errors::{FieldErrors, NON_FIELD_ERRORS};
pub use pagination::{Page, PageRequest};
