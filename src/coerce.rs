//! # Type Coercion Engine
//!
//! Turns one raw string into the typed [`ArgValue`] its [`ArgSpec`] declares.
//!
//! All parsing is culture-invariant: numbers use `.` as the decimal point and
//! no grouping separators, and dates/times must match one of a short list of
//! fixed-width literal formats exactly (first match wins).
//!
//! Filename kinds touch the filesystem (absolute-path resolution, existence).
//! Those checks are not atomic with whatever later opens the path.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

use crate::error::{ArgError, CoercionError};
use crate::range::parse_cell_range;
use crate::schema::{ArgKind, ArgSpec};
use crate::value::ArgValue;

/// An accepted date or time literal layout.
///
/// chrono's numeric specifiers accept variable-width fields, a sign and
/// leading whitespace, so every layout also carries an anchored regex that
/// pins the exact shape before chrono validates the values.
pub struct LiteralFormat {
    /// The layout as shown in error messages, e.g. `yyyy-MM-dd`.
    pub display: &'static str,
    chrono: &'static str,
    shape: Regex,
}

impl LiteralFormat {
    fn new(display: &'static str, chrono: &'static str, shape: &str) -> Self {
        Self {
            display,
            chrono,
            shape: Regex::new(shape).expect("Coerce: regex failure"),
        }
    }

    fn parse<T>(&self, raw: &str, parse: impl Fn(&str, &str) -> Option<T>) -> Option<T> {
        if !self.shape.is_match(raw) {
            return None;
        }
        parse(raw, self.chrono)
    }
}

/// Tried in order; the first layout that parses wins.
pub static DATE_FORMATS: LazyLock<Vec<LiteralFormat>> = LazyLock::new(|| {
    vec![
        LiteralFormat::new("yyyy-MM-dd", "%Y-%m-%d", r"^\d{4}-\d{2}-\d{2}$"),
        LiteralFormat::new("yyyy/MM/dd", "%Y/%m/%d", r"^\d{4}/\d{2}/\d{2}$"),
    ]
});

pub static DATE_TIME_FORMATS: LazyLock<Vec<LiteralFormat>> = LazyLock::new(|| {
    vec![
        LiteralFormat::new(
            "yyyy-MM-dd HH:mm:ss",
            "%Y-%m-%d %H:%M:%S",
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$",
        ),
        LiteralFormat::new(
            "yyyy/MM/dd HH:mm:ss",
            "%Y/%m/%d %H:%M:%S",
            r"^\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}$",
        ),
    ]
});

pub static TIME_FORMATS: LazyLock<Vec<LiteralFormat>> = LazyLock::new(|| {
    vec![
        LiteralFormat::new("HH:mm:ss", "%H:%M:%S", r"^\d{2}:\d{2}:\d{2}$"),
        LiteralFormat::new("HH:mm", "%H:%M", r"^\d{2}:\d{2}$"),
    ]
});

pub const TRUE_LITERALS: &[&str] = &["true", "1", "yes", "y"];
pub const FALSE_LITERALS: &[&str] = &["false", "0", "no", "n"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\w.\-]+)@([\w\-]+)((\.(\w){2,3})+)$").expect("Coerce: regex failure")
});

static GUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[{(]?[0-9A-F]{8}-?([0-9A-F]{4}-?){3}[0-9A-F]{12}[)}]?$")
        .expect("Coerce: regex failure")
});

/// Coerces `raw` into the type declared by `spec`.
///
/// `raw` is `None` when the argument name was the last token of the input;
/// that is always an error for a valued argument.
pub fn coerce(spec: &ArgSpec, raw: Option<&str>) -> Result<ArgValue, ArgError> {
    if spec.kind == ArgKind::Switch {
        return Ok(ArgValue::Switch);
    }

    let Some(raw) = raw else {
        return Err(CoercionError::MissingValue {
            name: spec.name.clone(),
        }
        .into());
    };

    let name = spec.name.as_str();
    let malformed = |expected: String| -> ArgError {
        CoercionError::Malformed {
            name: name.to_string(),
            value: raw.to_string(),
            kind: spec.kind,
            expected,
        }
        .into()
    };

    let value = match spec.kind {
        ArgKind::Switch => ArgValue::Switch,
        ArgKind::String => ArgValue::String(raw.to_string()),
        ArgKind::Filename => {
            let path = absolute(raw).ok_or_else(|| malformed("a valid filename".into()))?;
            if !is_valid_filename(&path) {
                return Err(malformed("a valid filename".into()));
            }
            ArgValue::Filename(path)
        }
        ArgKind::NewFilename => {
            let path = absolute(raw).ok_or_else(|| malformed("a valid filename".into()))?;
            if !is_valid_filename(&path) {
                return Err(malformed("a valid filename".into()));
            }
            if path.exists() {
                return Err(CoercionError::FileExists {
                    name: name.to_string(),
                    path,
                }
                .into());
            }
            ArgValue::NewFilename(path)
        }
        ArgKind::ExistingFilename => {
            let path = absolute(raw).ok_or_else(|| malformed("a valid filename".into()))?;
            if !path.is_file() {
                return Err(CoercionError::FileNotFound {
                    name: name.to_string(),
                    path,
                }
                .into());
            }
            ArgValue::ExistingFilename(path)
        }
        ArgKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(ArgValue::Integer)
            .map_err(|_| malformed("an integer".into()))?,
        ArgKind::Decimal => parse_decimal(raw)
            .map(ArgValue::Decimal)
            .ok_or_else(|| malformed("a decimal number".into()))?,
        ArgKind::Date => first_match(raw, &DATE_FORMATS, |s, f| NaiveDate::parse_from_str(s, f).ok())
            .map(ArgValue::Date)
            .ok_or_else(|| malformed(supported_formats(&DATE_FORMATS)))?,
        ArgKind::DateTime => first_match(raw, &DATE_TIME_FORMATS, |s, f| {
            NaiveDateTime::parse_from_str(s, f).ok()
        })
        .map(ArgValue::DateTime)
        .ok_or_else(|| malformed(supported_formats(&DATE_TIME_FORMATS)))?,
        ArgKind::Time => first_match(raw, &TIME_FORMATS, |s, f| NaiveTime::parse_from_str(s, f).ok())
            .map(ArgValue::Time)
            .ok_or_else(|| malformed(supported_formats(&TIME_FORMATS)))?,
        ArgKind::Boolean => parse_boolean(raw).map(ArgValue::Boolean).ok_or_else(|| {
            malformed(format!(
                "in a supported format. Supported formats: [{}, {}]",
                TRUE_LITERALS.join(", "),
                FALSE_LITERALS.join(", ")
            ))
        })?,
        ArgKind::Uri => Url::parse(raw)
            .map(ArgValue::Uri)
            .map_err(|_| malformed("an absolute URI".into()))?,
        ArgKind::EmailAddress => {
            if !EMAIL_RE.is_match(raw) {
                return Err(malformed("a valid email address".into()));
            }
            ArgValue::EmailAddress(raw.to_string())
        }
        ArgKind::Guid => {
            if !GUID_RE.is_match(raw) {
                return Err(malformed("a valid GUID".into()));
            }
            ArgValue::Guid(raw.to_string())
        }
        ArgKind::CellRange => parse_cell_range(raw)
            .map(ArgValue::CellRange)
            .map_err(|source| ArgError::Range {
                name: name.to_string(),
                source,
            })?,
        ArgKind::Enumerated => {
            if !spec.allowed_values.iter().any(|v| v == raw) {
                return Err(malformed(format!(
                    "in the valid range of values [{}]",
                    spec.allowed_values.join(", ")
                )));
            }
            ArgValue::Enumerated(raw.to_string())
        }
    };

    tracing::debug!("Coerced {} as {}", name, spec.kind);
    Ok(value)
}

fn supported_formats(formats: &[LiteralFormat]) -> String {
    let names: Vec<&str> = formats.iter().map(|f| f.display).collect();
    format!(
        "in a supported format. Supported formats: [{}]",
        names.join(", ")
    )
}

fn first_match<T>(
    raw: &str,
    formats: &[LiteralFormat],
    parse: impl Fn(&str, &str) -> Option<T>,
) -> Option<T> {
    formats.iter().find_map(|format| format.parse(raw, &parse))
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    // Rust also accepts "inf" and "NaN", which are not numbers here.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|d| d.is_finite())
}

fn parse_boolean(raw: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&raw) {
        Some(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// Resolves `raw` against the working directory unless it is already rooted.
fn absolute(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let path = Path::new(raw);
    if path.has_root() {
        return Some(path.to_path_buf());
    }
    std::path::absolute(path).ok()
}

#[cfg(windows)]
fn is_invalid_path_char(c: char) -> bool {
    c.is_control() || matches!(c, '"' | '<' | '>' | '|')
}

#[cfg(not(windows))]
fn is_invalid_path_char(c: char) -> bool {
    c.is_control()
}

/// Path-safety rules for the filename kinds:
/// - no OS-invalid characters
/// - no doubled separator except at the very start (UNC roots such as `\\server`)
/// - no segment with leading/trailing whitespace, and no blank segment
pub fn is_valid_filename(path: &Path) -> bool {
    let Some(text) = path.to_str() else {
        return false;
    };
    if text.is_empty() || text.chars().any(is_invalid_path_char) {
        return false;
    }

    let doubled: String = [MAIN_SEPARATOR, MAIN_SEPARATOR].iter().collect();
    if text.find(&doubled).is_some_and(|idx| idx >= 1) {
        return false;
    }

    text.trim_start_matches(MAIN_SEPARATOR)
        .split(MAIN_SEPARATOR)
        .all(|segment| segment.trim() == segment && !segment.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::range::{CellCoordinate, CellRange, RangeError};

    fn spec(kind: ArgKind) -> ArgSpec {
        ArgSpec::new("-x", kind)
    }

    fn ok(kind: ArgKind, raw: &str) -> ArgValue {
        coerce(&spec(kind), Some(raw))
            .unwrap_or_else(|e| panic!("{raw:?} should coerce as {kind}: {e}"))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_valid_literals() {
        let cases = vec![
            (ArgKind::String, "anything at all", ArgValue::String("anything at all".into())),
            (ArgKind::Integer, "42", ArgValue::Integer(42)),
            (ArgKind::Integer, "-7", ArgValue::Integer(-7)),
            (ArgKind::Integer, " 8 ", ArgValue::Integer(8)),
            (ArgKind::Decimal, "3.25", ArgValue::Decimal(3.25)),
            (ArgKind::Decimal, "-1e3", ArgValue::Decimal(-1000.0)),
            (ArgKind::Decimal, "12", ArgValue::Decimal(12.0)),
            (ArgKind::Date, "2024-01-31", ArgValue::Date(date(2024, 1, 31))),
            (ArgKind::Date, "2024/02/29", ArgValue::Date(date(2024, 2, 29))),
            (
                ArgKind::DateTime,
                "2024-01-31 13:45:10",
                ArgValue::DateTime(date(2024, 1, 31).and_hms_opt(13, 45, 10).expect("valid time")),
            ),
            (
                ArgKind::DateTime,
                "2024/01/31 00:00:00",
                ArgValue::DateTime(date(2024, 1, 31).and_hms_opt(0, 0, 0).expect("valid time")),
            ),
            (
                ArgKind::Time,
                "23:59:58",
                ArgValue::Time(NaiveTime::from_hms_opt(23, 59, 58).expect("valid time")),
            ),
            (
                ArgKind::Time,
                "07:30",
                ArgValue::Time(NaiveTime::from_hms_opt(7, 30, 0).expect("valid time")),
            ),
            (ArgKind::Boolean, "true", ArgValue::Boolean(true)),
            (ArgKind::Boolean, "y", ArgValue::Boolean(true)),
            (ArgKind::Boolean, "1", ArgValue::Boolean(true)),
            (ArgKind::Boolean, "no", ArgValue::Boolean(false)),
            (ArgKind::Boolean, "0", ArgValue::Boolean(false)),
            (ArgKind::EmailAddress, "jane.doe@example.com", ArgValue::EmailAddress("jane.doe@example.com".into())),
            (ArgKind::EmailAddress, "a-b@example.co.uk", ArgValue::EmailAddress("a-b@example.co.uk".into())),
            (
                ArgKind::Guid,
                "{3F2504E0-4F89-11D3-9A0C-0305E82C3301}",
                ArgValue::Guid("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}".into()),
            ),
            (
                ArgKind::Guid,
                "3f2504e04f8911d39a0c0305e82c3301",
                ArgValue::Guid("3f2504e04f8911d39a0c0305e82c3301".into()),
            ),
            (
                ArgKind::CellRange,
                "A1:C10",
                ArgValue::CellRange(CellRange::new(CellCoordinate::new(1, 1), CellCoordinate::new(3, 10))),
            ),
        ];

        for (kind, raw, expected) in cases {
            assert_eq!(ok(kind, raw), expected, "Wrong value for {} {:?}", kind, raw);
        }
    }

    #[test]
    fn test_malformed_literals() {
        let cases = vec![
            (ArgKind::Integer, "4.2"),
            (ArgKind::Integer, "forty"),
            (ArgKind::Integer, "1,000"),
            (ArgKind::Integer, ""),
            (ArgKind::Decimal, "1,5"),
            (ArgKind::Decimal, "NaN"),
            (ArgKind::Decimal, "inf"),
            (ArgKind::Decimal, "abc"),
            (ArgKind::Date, "31/01/2024"),
            (ArgKind::Date, "2024-02-30"),
            (ArgKind::Date, "2024.01.31"),
            (ArgKind::DateTime, "2024-01-31"),
            (ArgKind::DateTime, "2024-01-31T10:00:00"),
            (ArgKind::Time, "25:00"),
            (ArgKind::Time, "7pm"),
            // Fields are fixed width, unsigned and unpadded.
            (ArgKind::Date, "2024-1-5"),
            (ArgKind::Date, "24-01-31"),
            (ArgKind::Date, " 2024-01-31"),
            (ArgKind::Date, "2024-01-31 "),
            (ArgKind::Date, "+2024-01-31"),
            (ArgKind::Date, "20240-01-31"),
            (ArgKind::Time, "7:30"),
            (ArgKind::Time, "07:3"),
            (ArgKind::Time, "07:30:5"),
            (ArgKind::DateTime, "2024-1-31 1:2:3"),
            (ArgKind::DateTime, "2024-01-31  10:00:00"),
            (ArgKind::Boolean, "True"),
            (ArgKind::Boolean, "YES"),
            (ArgKind::Boolean, "maybe"),
            (ArgKind::Uri, "relative/path"),
            (ArgKind::Uri, "//no-scheme.example"),
            (ArgKind::EmailAddress, "no-at-sign.example.com"),
            (ArgKind::EmailAddress, "user@localhost"),
            (ArgKind::EmailAddress, "user@example.museum"),
            (ArgKind::Guid, "3F2504E0-4F89-11D3-9A0C"),
            (ArgKind::Guid, "ZZ2504E0-4F89-11D3-9A0C-0305E82C3301"),
        ];

        for (kind, raw) in cases {
            let err = coerce(&spec(kind), Some(raw)).expect_err(raw);
            assert_eq!(err.kind(), ErrorKind::TypeCoercion, "Wrong error kind for {} {:?}", kind, raw);
            match err {
                ArgError::Coercion(CoercionError::Malformed { name, value, kind: k, .. }) => {
                    assert_eq!(name, "-x");
                    assert_eq!(value, raw);
                    assert_eq!(k, kind);
                }
                other => panic!("Unexpected error for {raw:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_date_error_lists_formats() {
        let err = coerce(&spec(ArgKind::Date), Some("tomorrow")).expect_err("not a date");
        let message = err.to_string();
        assert!(message.contains("-x"), "{message}");
        assert!(message.contains("'tomorrow'"), "{message}");
        assert!(message.contains("[yyyy-MM-dd, yyyy/MM/dd]"), "{message}");
    }

    #[test]
    fn test_absolute_uri() {
        match ok(ArgKind::Uri, "https://example.com/a?b=c") {
            ArgValue::Uri(url) => {
                assert_eq!(url.scheme(), "https");
                assert_eq!(url.host_str(), Some("example.com"));
            }
            other => panic!("Expected a URI, got {other:?}"),
        }
    }

    #[test]
    fn test_enumerated_values() {
        let spec = ArgSpec::one_of("-format", ["html", "wikitable"]);
        assert_eq!(
            coerce(&spec, Some("wikitable")),
            Ok(ArgValue::Enumerated("wikitable".into()))
        );

        let err = coerce(&spec, Some("HTML")).expect_err("case-sensitive");
        assert!(err.to_string().contains("[html, wikitable]"), "{err}");
    }

    #[test]
    fn test_cell_range_errors_are_range_kind() {
        let cases = vec![
            ("A1", RangeError::Malformed("A1".into())),
            ("A1-C10", RangeError::Malformed("A1-C10".into())),
            ("A1:XFE2", RangeError::OutOfBounds("A1:XFE2".into())),
        ];

        for (raw, expected) in cases {
            assert_eq!(
                coerce(&spec(ArgKind::CellRange), Some(raw)),
                Err(ArgError::Range {
                    name: "-x".into(),
                    source: expected,
                }),
                "Wrong error for {}",
                raw
            );
        }
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            coerce(&spec(ArgKind::String), None),
            Err(ArgError::Coercion(CoercionError::MissingValue { name: "-x".into() }))
        );
        assert_eq!(coerce(&spec(ArgKind::Switch), None), Ok(ArgValue::Switch));
    }

    #[test]
    fn test_filename_safety_rules() {
        let sep = MAIN_SEPARATOR;
        let valid = vec![
            format!("{sep}tmp{sep}report.html"),
            format!("{sep}{sep}server{sep}share{sep}file.txt"),
            format!("{sep}data{sep}my file.xlsx"),
        ];
        let invalid = vec![
            format!("{sep}tmp{sep}{sep}report.html"),
            format!("{sep}tmp{sep} padded{sep}report.html"),
            format!("{sep}tmp{sep}report.html "),
            format!("{sep}tmp{sep}   {sep}report.html"),
            format!("{sep}tmp{sep}"),
            format!("{sep}tmp{sep}bad\u{7}name"),
        ];

        for path in valid {
            assert!(is_valid_filename(Path::new(&path)), "Should accept {path:?}");
        }
        for path in invalid {
            assert!(!is_valid_filename(Path::new(&path)), "Should reject {path:?}");
        }
    }

    #[test]
    fn test_filename_is_made_absolute() {
        match ok(ArgKind::Filename, "relative-output.html") {
            ArgValue::Filename(path) => {
                assert!(path.is_absolute(), "{path:?}");
                assert!(path.ends_with("relative-output.html"));
            }
            other => panic!("Expected a filename, got {other:?}"),
        }
    }

    #[test]
    fn test_new_and_existing_filenames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let existing = dir.path().join("present.xlsx");
        std::fs::write(&existing, b"x").expect("write fixture");
        let absent = dir.path().join("absent.xlsx");
        let existing_str = existing.to_str().expect("utf-8 path");
        let absent_str = absent.to_str().expect("utf-8 path");

        assert_eq!(
            coerce(&spec(ArgKind::ExistingFilename), Some(existing_str)),
            Ok(ArgValue::ExistingFilename(existing.clone()))
        );
        assert_eq!(
            coerce(&spec(ArgKind::ExistingFilename), Some(absent_str)),
            Err(ArgError::Coercion(CoercionError::FileNotFound {
                name: "-x".into(),
                path: absent.clone(),
            }))
        );
        // A directory is not a file.
        assert!(coerce(&spec(ArgKind::ExistingFilename), dir.path().to_str()).is_err());

        assert_eq!(
            coerce(&spec(ArgKind::NewFilename), Some(absent_str)),
            Ok(ArgValue::NewFilename(absent.clone()))
        );
        assert_eq!(
            coerce(&spec(ArgKind::NewFilename), Some(existing_str)),
            Err(ArgError::Coercion(CoercionError::FileExists {
                name: "-x".into(),
                path: existing,
            }))
        );
    }
}
