//! Worksheet reading.
//!
//! Reads a rectangle of cells from one worksheet and renders every cell as
//! text. Any format `calamine` recognizes (xlsx, xlsm, xlsb, xls, ods) works.

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

use crate::range::CellRange;
use crate::render::Rows;

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Every cell inside `range`, addressed by absolute 1-based coordinates.
/// Cells outside the sheet's data are empty strings.
fn select(sheet: &Range<Data>, range: CellRange) -> Rows {
    let area = range.normalized();
    (area.top_left.row..=area.bottom_right.row)
        .map(|row| {
            (area.top_left.column..=area.bottom_right.column)
                .map(|column| {
                    sheet
                        .get_value((row - 1, column - 1))
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Reads worksheet `worksheet` (1-based) from the workbook at `path`.
///
/// With no `range`, the worksheet's used area is returned.
#[tracing::instrument(skip(path, range), fields(path = %path.display()))]
pub fn read_rows(path: &Path, worksheet: usize, range: Option<CellRange>) -> Result<Rows> {
    let index = worksheet
        .checked_sub(1)
        .context("worksheet index is 1-based and must be at least 1")?;

    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("open workbook {}", path.display()))?;
    let sheet = workbook
        .worksheet_range_at(index)
        .with_context(|| format!("worksheet {worksheet} does not exist in {}", path.display()))?
        .with_context(|| format!("read worksheet {worksheet}"))?;

    let rows: Rows = match range {
        Some(range) => select(&sheet, range),
        None => sheet
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect(),
    };

    tracing::debug!("Read {} row(s) from worksheet {}", rows.len(), worksheet);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::parse_cell_range;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("fixture.xlsx");
        let mut workbook = Workbook::new();

        let first = workbook.add_worksheet();
        // Data starts at B2 so the used area is offset from A1.
        first.write_string(1, 1, "Name").expect("write");
        first.write_string(1, 2, "Qty").expect("write");
        first.write_string(2, 1, "Bolt").expect("write");
        first.write_number(2, 2, 12.0).expect("write");
        first.write_boolean(3, 1, true).expect("write");

        let second = workbook.add_worksheet();
        second.write_string(0, 0, "second").expect("write");

        workbook.save(&path).expect("save fixture");
        path
    }

    fn strings(rows: &[&[&str]]) -> Rows {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_reads_used_area() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(dir.path());

        let rows = read_rows(&path, 1, None).expect("read");
        assert_eq!(
            rows,
            strings(&[&["Name", "Qty"], &["Bolt", "12"], &["TRUE", ""]])
        );

        let rows = read_rows(&path, 2, None).expect("read");
        assert_eq!(rows, strings(&[&["second"]]));
    }

    #[test]
    fn test_reads_explicit_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(dir.path());

        let range = parse_cell_range("A2:C3").expect("valid range");
        let rows = read_rows(&path, 1, Some(range)).expect("read");
        assert_eq!(rows, strings(&[&["", "Name", "Qty"], &["", "Bolt", "12"]]));

        // Reversed corners select the same rectangle.
        let reversed = parse_cell_range("C3:A2").expect("valid range");
        assert_eq!(read_rows(&path, 1, Some(reversed)).expect("read"), rows);
    }

    #[test]
    fn test_rejects_bad_worksheet_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(dir.path());

        assert!(read_rows(&path, 0, None).is_err());
        assert!(read_rows(&path, 3, None).is_err());

        let not_a_workbook = dir.path().join("plain.xlsx");
        std::fs::write(&not_a_workbook, "not a zip").expect("write");
        assert!(read_rows(&not_a_workbook, 1, None).is_err());
    }
}
