//! # Output Renderers
//!
//! Turns a grid of cell strings into one of the supported output formats.
//! The first row is always treated as the header.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Rows of cell text, header first.
pub type Rows = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    WikiTable,
    JsonObjects,
    JsonArrays,
    Excel,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Html,
        OutputFormat::WikiTable,
        OutputFormat::JsonObjects,
        OutputFormat::JsonArrays,
        OutputFormat::Excel,
    ];

    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::WikiTable => "wikitable",
            OutputFormat::JsonObjects => "jsonobjects",
            OutputFormat::JsonArrays => "jsonarrays",
            OutputFormat::Excel => "excel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::WikiTable => "txt",
            OutputFormat::JsonObjects => "objects.json",
            OutputFormat::JsonArrays => "arrays.json",
            OutputFormat::Excel => "xlsx",
        }
    }

    /// `output-<yyyy-MM-dd_HHmmss>.<ext>`
    pub fn default_file_name(self, now: NaiveDateTime) -> String {
        format!("output-{}.{}", now.format("%Y-%m-%d_%H%M%S"), self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==============================
// Text formats
// ==============================

const HTML_STYLE: &str = "<style type='text/css'>\ntable {\n\tborder-collapse: collapse;\n}\n\n\
table, th, td {\n\tborder: 1px solid black;\n}\n</style>\n";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(rows: &[Vec<String>]) -> String {
    let mut out = String::from(HTML_STYLE);
    out.push_str("<table>\n");
    for (i, row) in rows.iter().enumerate() {
        let tag = if i == 0 { "th" } else { "td" };
        out.push_str("\t<tr>\n");
        for cell in row {
            out.push_str(&format!("\t\t<{tag}>{}</{tag}>\n", escape_html(cell)));
        }
        out.push_str("\t</tr>\n");
    }
    out.push_str("</table>\n");
    out
}

pub fn to_wikitable(rows: &[Vec<String>]) -> String {
    let mut out = String::from("{| class=\"wikitable\"\n");
    for (i, row) in rows.iter().enumerate() {
        out.push_str("|-\n");
        if i == 0 {
            out.push_str("! ");
            out.push_str(&row.join(" !! "));
        } else {
            out.push_str("| ");
            out.push_str(&row.join(" || "));
        }
        out.push('\n');
    }
    out.push_str("|}\n");
    out
}

pub fn to_json_arrays(rows: &[Vec<String>]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("serialize rows as JSON arrays")
}

/// Header cells made usable as object keys: a repeated name gets a `_<n>`
/// suffix, counting from 2, so no column is dropped.
fn unique_keys(header: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .map(|name| {
            let mut key = name.clone();
            let mut n = 2;
            while !seen.insert(key.clone()) {
                key = format!("{name}_{n}");
                n += 1;
            }
            key
        })
        .collect()
}

/// One object per data row keyed by the header row. Cells past the end of
/// the header are dropped; a short row simply has fewer keys. Duplicate
/// header names are suffixed, see [`unique_keys`].
pub fn to_json_objects(rows: &[Vec<String>]) -> Result<String> {
    let Some((header, body)) = rows.split_first() else {
        return Ok("[]".to_string());
    };
    let keys = unique_keys(header);

    let objects: Vec<JsonValue> = body
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = keys
                .iter()
                .zip(row)
                .map(|(key, cell)| (key.clone(), JsonValue::String(cell.clone())))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&objects).context("serialize rows as JSON objects")
}

// ==============================
// Workbook output
// ==============================

/// Name of the single worksheet in an exported workbook.
pub const EXPORT_SHEET_NAME: &str = "Exported";

/// Writes `rows` to a new workbook, one string cell per value, with the
/// header row in bold.
pub fn write_workbook(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(EXPORT_SHEET_NAME)
        .context("name exported worksheet")?;

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx).context("row index exceeds worksheet limits")?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx).context("column index exceeds worksheet limits")?;
            let written = if row_idx == 0 {
                worksheet.write_string_with_format(row_num, col_num, cell, &header_format)
            } else {
                worksheet.write_string(row_num, col_num, cell)
            };
            written.with_context(|| format!("write cell at row {} column {}", row_idx + 1, col_idx + 1))?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

/// Renders `rows` as `format` and writes the result to `path`.
pub fn write_output(format: OutputFormat, rows: &[Vec<String>], path: &Path) -> Result<()> {
    let text = match format {
        OutputFormat::Excel => return write_workbook(rows, path),
        OutputFormat::Html => to_html(rows),
        OutputFormat::WikiTable => to_wikitable(rows),
        OutputFormat::JsonArrays => to_json_arrays(rows)?,
        OutputFormat::JsonObjects => to_json_objects(rows)?,
    };
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    tracing::info!("Wrote {} output to {}", format, path.display());
    Ok(())
}
