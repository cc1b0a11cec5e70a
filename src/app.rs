//! # Conversion Driver
//!
//! Declares the tool's own arguments and runs one conversion:
//! parse arguments, read the worksheet, render, write.
//!
//! Failures are split by exit status: argument problems exit with 1 and are
//! shown together with the usage banner, file problems exit with 2.

use chrono::Local;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ToolConfig;
use crate::error::{ArgError, CoercionError, ConstraintError};
use crate::parser::ArgParser;
use crate::render::{OutputFormat, write_output};
use crate::schema::{ArgKind, ArgSpec, Schema};
use crate::usage::render_usage;
use crate::value::ArgValue;
use crate::workbook::read_rows;

pub const FILENAME: &str = "-filename";
pub const OUTFILE: &str = "-outfile";
pub const FORMAT: &str = "-format";
pub const WORKSHEET: &str = "-worksheet";
pub const RANGE: &str = "-range";
pub const QUIET: &str = "-quiet";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Usage(#[from] ArgError),

    #[error("ErrorOpeningFile: {0:#}")]
    Read(anyhow::Error),

    #[error("ErrorWritingFile: {0:#}")]
    Write(anyhow::Error),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Usage(_) => 1,
            RunError::Read(_) | RunError::Write(_) => 2,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub rows: usize,
    pub output: PathBuf,
    pub quiet: bool,
}

impl Report {
    /// The line printed after a run, unless `-quiet` was given.
    pub fn summary(&self) -> Option<String> {
        if self.quiet {
            return None;
        }
        Some(format!("Wrote {} rows to {}", self.rows, self.output.display()))
    }
}

fn default_format(config: &ToolConfig) -> OutputFormat {
    let Some(name) = config.default_format.as_deref() else {
        return OutputFormat::Html;
    };
    OutputFormat::from_name(name).unwrap_or_else(|| {
        tracing::warn!("Ignoring unknown default format '{}' in configuration", name);
        OutputFormat::Html
    })
}

/// The arguments this tool accepts.
pub fn schema(config: &ToolConfig) -> Result<Schema, ArgError> {
    let format_names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.name()).collect();
    let specs = vec![
        ArgSpec::new(FILENAME, ArgKind::ExistingFilename)
            .required()
            .placeholder("excelfilename")
            .description("Required. The Excel file name"),
        ArgSpec::new(OUTFILE, ArgKind::String)
            .placeholder("outputfilename")
            .description("Optional. The output file name. Defaults to output-<timestamp>.<ext>"),
        ArgSpec::one_of(FORMAT, format_names.iter().copied())
            .default_value(ArgValue::Enumerated(default_format(config).name().to_string()))
            .placeholder(format_names.join("|"))
            .description("Optional. The output format"),
        ArgSpec::new(WORKSHEET, ArgKind::Integer)
            .default_value(ArgValue::Integer(1))
            .placeholder("1-n")
            .description("Optional. The 1-based worksheet index. Defaults to 1"),
        ArgSpec::new(RANGE, ArgKind::CellRange)
            .placeholder("excelrange")
            .description("Optional. The cell range to convert, e.g. A1:C10. Defaults to the used area"),
        ArgSpec::switch(QUIET).description("Optional. Do not print a summary"),
    ];
    Ok(Schema::new(specs)?)
}

/// The usage banner for this tool, as printed on argument errors.
pub fn usage(program: &str, config: &ToolConfig) -> Result<String, ArgError> {
    Ok(render_usage(program, &schema(config)?))
}

fn worksheet_index(value: i64) -> Result<usize, ArgError> {
    usize::try_from(value)
        .ok()
        .filter(|index| *index >= 1)
        .ok_or_else(|| {
            CoercionError::Malformed {
                name: WORKSHEET.to_string(),
                value: value.to_string(),
                kind: ArgKind::Integer,
                expected: "a worksheet index of at least 1".to_string(),
            }
            .into()
        })
}

#[tracing::instrument(skip_all)]
pub fn run<I, S>(args: I, config: &ToolConfig) -> Result<Report, RunError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let schema = schema(config)?;
    let parsed = ArgParser::new(&schema).parse(args)?;

    // Every lookup below is backed by a required argument or a default.
    let input = parsed
        .path(FILENAME)
        .ok_or_else(|| ArgError::from(ConstraintError::MissingRequired(FILENAME.into())))?
        .to_path_buf();
    let format = parsed
        .text(FORMAT)
        .and_then(OutputFormat::from_name)
        .unwrap_or_else(|| default_format(config));
    let worksheet = worksheet_index(parsed.integer(WORKSHEET).unwrap_or(1))?;
    let range = parsed.cell_range(RANGE);

    let output = match parsed.text(OUTFILE) {
        Some(name) => PathBuf::from(name),
        None => PathBuf::from(format.default_file_name(Local::now().naive_local())),
    };
    let output = config.resolve_output(&output);

    tracing::info!(
        "Converting worksheet {} of {} to {} ({})",
        worksheet,
        input.display(),
        output.display(),
        format
    );

    let rows = read_rows(&input, worksheet, range).map_err(RunError::Read)?;
    write_output(format, &rows, &output).map_err(RunError::Write)?;

    Ok(Report {
        rows: rows.len(),
        output,
        quiet: parsed.flag(QUIET),
    })
}
