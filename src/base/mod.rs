//! Foundation types for the type model.
//!
//! - [`Name`] - Identifier strings
//! - [`fresh_name`] - Suffix probing for unused names
//!
//! This module has NO dependencies on other crate modules.

mod name;

pub use name::{Name, fresh_name};

// Re-export smol_str for callers building names directly
pub use smol_str;
