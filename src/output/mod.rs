//! Output formatting for the command line tool.
//!
//! This module handles printing check results:
//! - [`terminal`] - Terminal output with colors
//! - [`json`] - JSON output

mod json;
mod terminal;

pub use json::classification_json;
pub use terminal::{
    format_check, format_field, format_verdict, print_check, print_classification,
};
