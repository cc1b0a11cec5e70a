//! # Argument Parser
//!
//! Runs one argument vector through the whole engine:
//! 1. **Tokenize**: pull out declared switches, pair the rest as `name value`
//! 2. **Check names**: duplicates, then undeclared names
//! 3. **Coerce**: each pair's raw value into its declared type, in input order
//! 4. **Constrain**: exclusion, inclusion, required presence, defaults
//!
//! The first failure aborts the parse; there is no partial result.

use crate::coerce::coerce;
use crate::error::{ArgError, SchemaError};
use crate::schema::Schema;
use crate::tokenizer::tokenize;
use crate::validate::{check_constraints, check_names};
use crate::value::{ArgValue, ParsedArgs};

pub struct ArgParser<'a> {
    schema: &'a Schema,
}

impl<'a> ArgParser<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[tracing::instrument(skip_all)]
    pub fn parse<I, S>(&self, args: I) -> Result<ParsedArgs, ArgError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokenize(self.schema, args);
        check_names(self.schema, &tokens)?;

        let mut parsed = ParsedArgs::default();
        for name in &tokens.switches {
            parsed.insert(name.clone(), ArgValue::Switch);
        }

        for pair in &tokens.pairs {
            let spec = self
                .schema
                .get(&pair.name)
                .ok_or_else(|| SchemaError::UnsupportedArgument(pair.name.clone()))?;
            let value = coerce(spec, pair.value.as_deref())?;
            parsed.insert(pair.name.clone(), value);
        }

        check_constraints(self.schema, &mut parsed)?;

        tracing::debug!("Parsed {} argument(s)", parsed.len());
        Ok(parsed)
    }
}

/// Parses `args` against `schema` in one call.
pub fn parse_args<I, S>(schema: &Schema, args: I) -> Result<ParsedArgs, ArgError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ArgParser::new(schema).parse(args)
}
