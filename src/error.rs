//! # Argument Errors
//!
//! Every failure the argument engine can report, grouped into four kinds:
//! - **Schema**: duplicate or unknown argument names (and malformed schemas)
//! - **Coercion**: a raw value that does not satisfy its declared type
//! - **Constraint**: missing required arguments, exclusion and inclusion rules
//! - **Range**: a cell-range value that fails the grammar or worksheet bounds
//!
//! Parsing is fail-fast: the first violation aborts and is returned as a
//! single [`ArgError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::range::RangeError;
use crate::schema::ArgKind;

/// Coarse classification of an [`ArgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    TypeCoercion,
    Constraint,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Duplicate argument {0}")]
    DuplicateArgument(String),

    #[error("Argument not supported: {0}")]
    UnsupportedArgument(String),

    /// The host application declared the same name twice.
    #[error("Argument {0} is declared more than once in the schema")]
    DuplicateSpec(String),

    #[error("Argument {name} refers to undeclared argument {referenced}")]
    UnknownReference { name: String, referenced: String },

    #[error("Argument {0} is an enumerated value but declares no allowed values")]
    EmptyValueSet(String),

    #[error("Default value for argument {name} is {found:?}, expected {expected:?}")]
    DefaultKindMismatch {
        name: String,
        expected: ArgKind,
        found: ArgKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("Argument {name} requires a value")]
    MissingValue { name: String },

    #[error("Argument malformed. Argument {name} => '{value}' is not {expected}")]
    Malformed {
        name: String,
        value: String,
        kind: ArgKind,
        expected: String,
    },

    #[error("File already exists: {name} => '{}'", path.display())]
    FileExists { name: String, path: PathBuf },

    #[error("File not found: {name} => '{}'", path.display())]
    FileNotFound { name: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Required argument {0} not provided")]
    MissingRequired(String),

    #[error("Argument '{excluded}' cannot be passed if argument '{argument}' has been passed.")]
    Exclusion { argument: String, excluded: String },

    #[error("Argument '{missing}' must be passed if argument '{argument}' has been passed.")]
    Inclusion { argument: String, missing: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error("Worksheet range parameter {name} is not valid: {source}")]
    Range { name: String, source: RangeError },
}

impl ArgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgError::Schema(_) => ErrorKind::Schema,
            ArgError::Coercion(_) => ErrorKind::TypeCoercion,
            ArgError::Constraint(_) => ErrorKind::Constraint,
            ArgError::Range { .. } => ErrorKind::Range,
        }
    }
}
