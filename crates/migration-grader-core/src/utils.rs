//! Helpers for detector implementations.

pub mod lines;
pub mod patterns;
pub mod views;

#[doc(inline)]
pub use lines::LinePattern;
#[doc(inline)]
pub use patterns::{attribute, call, closing_tag, import_from, opening_tag, word};
#[doc(inline)]
pub use views::{count_attribute, count_imports, count_tags};
