//! Opaque identifier generation for records, fields, views and select options.

use uuid::Uuid;

/// What an identifier is going to name.
///
/// Advisory only: the generated value does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Record,
    Field,
    View,
    Option,
}

/// Generate a statistically unique, opaque identifier.
///
/// No ordering is implied between two generated ids.
pub fn generate_id(kind: Option<IdKind>) -> String {
    let _ = kind;
    Uuid::new_v4().simple().to_string()
}
