//! Redacted report rendering.
//!
//! Responsibilities:
//! - Render a record's fields as an aligned OPTION / ENV VAR / SETTING
//!   table.
//! - Mask resolved values of secret fields.
//!
//! Does NOT handle:
//! - Field resolution or record mutation (see env.rs, loader.rs).
//!
//! Invariants:
//! - A secret field's real value never appears in the output; an empty
//!   value stays empty so "not set" remains distinguishable from "set".
//! - Rows follow field declaration order.

use std::io::Write;

use crate::error::ConfigError;
use crate::field::{EnvRecord, FieldValue};

/// Mask substituted for non-empty secret values.
pub const MASK: &str = "********";

/// Minimum spacing between columns in the rendered report.
const COLUMN_PADDING: usize = 3;

const HEADERS: [&str; 3] = ["OPTION", "ENV VAR", "SETTING"];

fn render_value(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::I32(value) => value.to_string(),
        FieldValue::Bool(value) => value.to_string(),
        FieldValue::Str(value) => value.to_owned(),
        FieldValue::List(items) => format!("[{}]", items.join(" ")),
        FieldValue::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect();
            format!("{{{}}}", entries.join(" "))
        }
    }
}

/// Render the report for `record` as a string.
///
/// One row per field, in declaration order: field name, env key, resolved
/// value. Non-empty values of secret fields render as [`MASK`]; empty ones
/// stay empty.
pub fn render<R: EnvRecord>(record: &R) -> String {
    let mut rows = Vec::with_capacity(R::FIELDS.len() + 1);
    rows.push(HEADERS.map(str::to_owned));
    for spec in R::FIELDS {
        let mut value = render_value((spec.get)(record));
        if spec.secret && !value.is_empty() {
            value = MASK.to_owned();
        }
        rows.push([spec.name.to_owned(), spec.env.to_owned(), value]);
    }

    let name_width = column_width(&rows, 0);
    let env_width = column_width(&rows, 1);

    let mut out = String::new();
    for [name, env, value] in rows {
        let line = format!("{name:<name_width$}{env:<env_width$}{value}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn column_width(rows: &[[String; 3]], column: usize) -> usize {
    let widest = rows.iter().map(|row| row[column].len()).max().unwrap_or(0);
    widest + COLUMN_PADDING
}

/// Render the report for `record` into `out`.
pub fn write_report<R: EnvRecord, W: Write>(record: &R, out: &mut W) -> Result<(), ConfigError> {
    out.write_all(render(record).as_bytes())?;
    Ok(())
}

/// Render the report for `record` to standard output.
pub fn print<R: EnvRecord>(record: &R) -> Result<(), ConfigError> {
    write_report(record, &mut std::io::stdout().lock())
}
