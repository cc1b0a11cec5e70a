//! Library entry point for exceltotable.
//!
//! The argument engine (`schema`, `tokenizer`, `coerce`, `validate`,
//! `parser`) is independent of spreadsheets; `workbook`, `render` and `app`
//! build the conversion tool on top of it.

// Argument engine:
pub mod coerce;
pub mod error;
pub mod parser;
pub mod range;
pub mod schema;
pub mod tokenizer;
pub mod usage;
pub mod validate;
pub mod value;

// Conversion tool:
pub mod app;
pub mod config;
pub mod render;
pub mod workbook;

pub use error::{ArgError, ErrorKind};
pub use parser::{ArgParser, parse_args};
pub use range::{CellCoordinate, CellRange};
pub use schema::{ArgKind, ArgSpec, Schema};
pub use value::{ArgValue, ParsedArgs};
