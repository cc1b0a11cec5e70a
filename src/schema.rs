//! # Argument Schema
//!
//! The ordered list of arguments an application accepts, declared before any
//! parsing happens. A [`Schema`] is validated once on construction and is
//! read-only afterwards, so one schema can drive any number of parses.

use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;

use crate::error::SchemaError;
use crate::value::ArgValue;

/// Names listed in an argument's exclusion or inclusion rule.
pub type NameList = SmallVec<[String; 4]>;

/// The closed set of value types an argument can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Takes no value; presence is the signal.
    Switch,
    String,
    /// Path-safe file name, made absolute.
    Filename,
    /// Path-safe file name that must not exist yet.
    NewFilename,
    /// File name that must exist on disk.
    ExistingFilename,
    Integer,
    Decimal,
    Date,
    DateTime,
    Time,
    Boolean,
    Uri,
    EmailAddress,
    Guid,
    CellRange,
    /// One of the argument's `allowed_values`.
    Enumerated,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Switch => "switch",
            ArgKind::String => "string",
            ArgKind::Filename => "filename",
            ArgKind::NewFilename => "new filename",
            ArgKind::ExistingFilename => "existing filename",
            ArgKind::Integer => "integer",
            ArgKind::Decimal => "decimal",
            ArgKind::Date => "date",
            ArgKind::DateTime => "date/time",
            ArgKind::Time => "time",
            ArgKind::Boolean => "boolean",
            ArgKind::Uri => "URI",
            ArgKind::EmailAddress => "email address",
            ArgKind::Guid => "GUID",
            ArgKind::CellRange => "cell range",
            ArgKind::Enumerated => "enumerated value",
        };
        f.write_str(name)
    }
}

/// One declared command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub kind: ArgKind,
    pub required: bool,
    pub default_value: Option<ArgValue>,
    /// Arguments that must not be passed alongside this one.
    pub excludes: NameList,
    /// Arguments that must be passed alongside this one.
    pub includes: NameList,
    /// Accepted literals when `kind` is [`ArgKind::Enumerated`].
    pub allowed_values: Vec<String>,
    /// Value placeholder shown in the usage banner.
    pub placeholder: String,
    pub description: String,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default_value: None,
            excludes: NameList::new(),
            includes: NameList::new(),
            allowed_values: Vec::new(),
            placeholder: String::new(),
            description: String::new(),
        }
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self::new(name, ArgKind::Switch)
    }

    /// An enumerated argument accepting exactly `values`.
    pub fn one_of<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, ArgKind::Enumerated);
        spec.allowed_values = values.into_iter().map(Into::into).collect();
        spec
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: ArgValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn includes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_switch(&self) -> bool {
        self.kind == ArgKind::Switch
    }
}

/// A validated, immutable list of [`ArgSpec`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    specs: Vec<ArgSpec>,
}

impl Schema {
    /// Builds a schema, rejecting duplicate names, rules that mention
    /// undeclared arguments, empty enumerations and mistyped defaults.
    pub fn new(specs: Vec<ArgSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateSpec(spec.name.clone()));
            }
        }

        for spec in &specs {
            if let Some(referenced) = spec
                .excludes
                .iter()
                .chain(spec.includes.iter())
                .find(|r| !seen.contains(r.as_str()))
            {
                return Err(SchemaError::UnknownReference {
                    name: spec.name.clone(),
                    referenced: referenced.clone(),
                });
            }

            if spec.kind == ArgKind::Enumerated && spec.allowed_values.is_empty() {
                return Err(SchemaError::EmptyValueSet(spec.name.clone()));
            }

            if let Some(default) = &spec.default_value
                && default.kind() != spec.kind
            {
                return Err(SchemaError::DefaultKindMismatch {
                    name: spec.name.clone(),
                    expected: spec.kind,
                    found: default.kind(),
                });
            }
        }

        Ok(Self { specs })
    }

    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ArgSpec> {
        self.specs.iter()
    }

    pub fn switches(&self) -> impl Iterator<Item = &ArgSpec> {
        self.specs.iter().filter(|s| s.is_switch())
    }

    pub fn required(&self) -> impl Iterator<Item = &ArgSpec> {
        self.specs.iter().filter(|s| s.required)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ArgSpec;
    type IntoIter = std::slice::Iter<'a, ArgSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
