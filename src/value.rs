//! Typed argument values and the parse result.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::range::CellRange;
use crate::schema::ArgKind;

/// A coerced argument value, one variant per [`ArgKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Presence marker for a switch.
    Switch,
    String(String),
    Filename(PathBuf),
    NewFilename(PathBuf),
    ExistingFilename(PathBuf),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Boolean(bool),
    Uri(Url),
    EmailAddress(String),
    /// Kept as typed, braces and hyphens included.
    Guid(String),
    CellRange(CellRange),
    Enumerated(String),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Switch => ArgKind::Switch,
            ArgValue::String(_) => ArgKind::String,
            ArgValue::Filename(_) => ArgKind::Filename,
            ArgValue::NewFilename(_) => ArgKind::NewFilename,
            ArgValue::ExistingFilename(_) => ArgKind::ExistingFilename,
            ArgValue::Integer(_) => ArgKind::Integer,
            ArgValue::Decimal(_) => ArgKind::Decimal,
            ArgValue::Date(_) => ArgKind::Date,
            ArgValue::DateTime(_) => ArgKind::DateTime,
            ArgValue::Time(_) => ArgKind::Time,
            ArgValue::Boolean(_) => ArgKind::Boolean,
            ArgValue::Uri(_) => ArgKind::Uri,
            ArgValue::EmailAddress(_) => ArgKind::EmailAddress,
            ArgValue::Guid(_) => ArgKind::Guid,
            ArgValue::CellRange(_) => ArgKind::CellRange,
            ArgValue::Enumerated(_) => ArgKind::Enumerated,
        }
    }

    /// The textual payload of string-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s)
            | ArgValue::EmailAddress(s)
            | ArgValue::Guid(s)
            | ArgValue::Enumerated(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The path payload of any filename kind.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ArgValue::Filename(p) | ArgValue::NewFilename(p) | ArgValue::ExistingFilename(p) => {
                Some(p.as_path())
            }
            _ => None,
        }
    }
}

/// The validated result of one parse: argument name to typed value.
///
/// Holds exactly one value per name. Switches that were passed map to
/// [`ArgValue::Switch`]; optional arguments that were omitted appear only if
/// their spec declares a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: HashMap<String, ArgValue>,
}

impl ParsedArgs {
    pub(crate) fn insert(&mut self, name: String, value: ArgValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the switch `name` was passed.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Switch))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.get(name).and_then(ArgValue::as_path)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ArgValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ArgValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.get(name)? {
            ArgValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn date_time(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name)? {
            ArgValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn time(&self, name: &str) -> Option<NaiveTime> {
        match self.get(name)? {
            ArgValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn uri(&self, name: &str) -> Option<&Url> {
        match self.get(name)? {
            ArgValue::Uri(u) => Some(u),
            _ => None,
        }
    }

    pub fn cell_range(&self, name: &str) -> Option<CellRange> {
        match self.get(name)? {
            ArgValue::CellRange(r) => Some(*r),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
