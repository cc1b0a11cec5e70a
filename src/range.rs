//! # Cell-Range Decoder
//!
//! Decodes spreadsheet range notation (`A1:C10`, `BMZ4:BNC14`) into numeric
//! 1-based coordinates.
//!
//! Grammar: `<COLS><ROW>:<COLS><ROW>` where `<COLS>` is 1-3 uppercase letters
//! and `<ROW>` is 1-7 digits. The whole string must match. Column letters use
//! Excel's bijective base-26 numbering (`A` = 1, `Z` = 26, `AA` = 27).
//!
//! No ordering is enforced between the two corners: `C10:A1` decodes as
//! written.

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::sequence::separated_pair;
use nom::{IResult, Parser};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Widest column index an Excel worksheet supports (`XFD`).
pub const MAX_COLUMNS: u32 = 16_384;
/// Tallest row index an Excel worksheet supports.
pub const MAX_ROWS: u32 = 1_048_576;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{0}' is not a cell range of the form A1:C10")]
    Malformed(String),

    #[error("'{0}' exceeds the worksheet bounds of 16384 columns by 1048576 rows")]
    OutOfBounds(String),
}

/// A single 1-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoordinate {
    pub column: u32,
    pub row: u32,
}

impl CellCoordinate {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    fn in_bounds(&self) -> bool {
        (1..=MAX_COLUMNS).contains(&self.column) && (1..=MAX_ROWS).contains(&self.row)
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

/// A rectangular worksheet selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub top_left: CellCoordinate,
    pub bottom_right: CellCoordinate,
}

impl CellRange {
    pub fn new(top_left: CellCoordinate, bottom_right: CellCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// The same rectangle with its corners swapped as needed so that
    /// `top_left` is above and left of `bottom_right`.
    pub fn normalized(&self) -> Self {
        Self {
            top_left: CellCoordinate::new(
                self.top_left.column.min(self.bottom_right.column),
                self.top_left.row.min(self.bottom_right.row),
            ),
            bottom_right: CellCoordinate::new(
                self.top_left.column.max(self.bottom_right.column),
                self.top_left.row.max(self.bottom_right.row),
            ),
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

impl FromStr for CellRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cell_range(s)
    }
}

// ==============================
// Grammar
// ==============================

fn column_letters(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 3, |c: char| c.is_ascii_uppercase()).parse(input)
}

fn row_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 7, |c: char| c.is_ascii_digit()).parse(input)
}

fn cell_ref(input: &str) -> IResult<&str, (&str, &str)> {
    (column_letters, row_digits).parse(input)
}

type RawRange<'a> = ((&'a str, &'a str), (&'a str, &'a str));

fn range_expr(input: &str) -> IResult<&str, RawRange<'_>> {
    all_consuming(separated_pair(cell_ref, char(':'), cell_ref)).parse(input)
}

// ==============================
// Decoding
// ==============================

/// Converts column letters to a 1-based index. `"AB"` is 28.
///
/// The letters are weighted least-significant first: the last letter counts
/// once, the one before it 26 times, and so on.
pub fn column_index(letters: &str) -> u32 {
    letters
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'A' + 1) * 26u32.pow(i as u32))
        .sum()
}

/// Inverse of [`column_index`]. `28` is `"AB"`; `0` yields an empty string.
pub fn column_name(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn decode_cell(raw: (&str, &str)) -> Option<CellCoordinate> {
    let (letters, digits) = raw;
    let row = digits.parse::<u32>().ok()?;
    Some(CellCoordinate::new(column_index(letters), row))
}

/// Decodes a range literal such as `"A1:C10"`.
///
/// Fails with [`RangeError::Malformed`] when the text does not match the
/// grammar and [`RangeError::OutOfBounds`] when either corner falls outside
/// the worksheet.
pub fn parse_cell_range(range: &str) -> Result<CellRange, RangeError> {
    let (_, (first, second)) =
        range_expr(range).map_err(|_| RangeError::Malformed(range.to_string()))?;

    let (Some(top_left), Some(bottom_right)) = (decode_cell(first), decode_cell(second)) else {
        return Err(RangeError::Malformed(range.to_string()));
    };

    if !top_left.in_bounds() || !bottom_right.in_bounds() {
        return Err(RangeError::OutOfBounds(range.to_string()));
    }

    Ok(CellRange::new(top_left, bottom_right))
}
