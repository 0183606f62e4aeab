//! In-memory record transformations.
//!
//! These operate on borrowed [`crate::types::RecordData`] slices and never mutate their input.
//!
//! - [`filter()`]: view filters, combined with AND
//! - [`sort()`]: stable multi-key view sorts
//! - [`group_by()`] / [`group_by_field()`]: first-seen-order grouping
//! - [`reduce()`]: count/sum/avg/min/max over numeric readings

pub mod filter;
pub mod group;
pub mod reduce;
pub mod sort;

pub use filter::{filter, matches_filter};
pub use group::{category_label, group_by, group_by_field, EMPTY_GROUP_LABEL};
pub use reduce::{field_values, reduce, reduce_field, ReduceOp};
pub use sort::sort;
