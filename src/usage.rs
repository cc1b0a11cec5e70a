//! Usage banner rendering.
//!
//! The program name is passed in by the caller rather than read from the
//! process, so the banner is deterministic.

use crate::schema::{ArgSpec, Schema};

/// The one-line synopsis for a single argument, e.g. `-worksheet [1-n]`.
pub fn synopsis(spec: &ArgSpec) -> String {
    if spec.is_switch() {
        return format!("[{}]", spec.name);
    }
    if spec.required {
        format!("{} {}", spec.name, spec.placeholder)
    } else {
        format!("{} [{}]", spec.name, spec.placeholder)
    }
}

/// Renders the usage banner: a synopsis line, then one description line per
/// argument in schema order.
pub fn render_usage(program: &str, schema: &Schema) -> String {
    let mut out = format!("Usage: {program}");
    for spec in schema {
        out.push(' ');
        out.push_str(&synopsis(spec));
    }
    out.push_str("\n\n");

    for spec in schema {
        out.push_str(&format!("{}:\t\t{}\n", spec.name, spec.description));
    }
    out
}
