//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use crate::models::Classification;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// `true` in green, `false` in red.
pub fn format_verdict(verdict: bool) -> String {
    if verdict {
        "true".green().to_string()
    } else {
        "false".red().to_string()
    }
}

/// One line for a membership check: the address, then the verdict.
pub fn format_check(address: &str, verdict: bool) -> String {
    format!("{address} {}", format_verdict(verdict))
}

/// Print the result of a membership check.
pub fn print_check(address: &str, verdict: bool) {
    println!("{}", format_check(address, verdict));
}

/// Print one aligned line per classification flag.
pub fn print_classification(classification: &Classification) {
    println!(
        "{} {}",
        format_field("family", 13),
        format_field(classification.family, 7)
    );
    for (name, verdict) in classification.flags() {
        println!("{} {}", format_field(name, 13), format_verdict(verdict));
    }
    if let Some(mapped) = &classification.mapped_ipv4 {
        println!("{} {}", format_field("mapped_ipv4", 13), mapped.on_blue());
    }
}
