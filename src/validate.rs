//! # Constraint Validator
//!
//! Two passes around coercion:
//! - [`check_names`] runs on the raw tokens: duplicate names, then names the
//!   schema does not declare.
//! - [`check_constraints`] runs on the coerced map: mutual exclusion, mutual
//!   inclusion, required presence, then default injection.
//!
//! Exclusion and inclusion only look at arguments that were actually
//! supplied; defaults are injected last and never trigger either rule.

use std::collections::HashSet;

use crate::error::{ArgError, ConstraintError, SchemaError};
use crate::schema::Schema;
use crate::tokenizer::Tokens;
use crate::value::ParsedArgs;

pub fn check_names(schema: &Schema, tokens: &Tokens) -> Result<(), ArgError> {
    let mut seen = HashSet::new();
    for name in tokens.names() {
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateArgument(name.to_string()).into());
        }
    }

    if let Some(unknown) = tokens.names().find(|name| !schema.contains(name)) {
        return Err(SchemaError::UnsupportedArgument(unknown.to_string()).into());
    }

    Ok(())
}

/// Enforces exclusion, inclusion and required rules on the supplied
/// arguments, then fills in defaults for omitted optional arguments.
pub fn check_constraints(schema: &Schema, parsed: &mut ParsedArgs) -> Result<(), ArgError> {
    debug_assert!(parsed.iter().all(|(name, _)| schema.contains(name)));

    for spec in schema.iter().filter(|s| parsed.contains(&s.name)) {
        if let Some(excluded) = spec.excludes.iter().find(|e| parsed.contains(e)) {
            return Err(ConstraintError::Exclusion {
                argument: spec.name.clone(),
                excluded: excluded.clone(),
            }
            .into());
        }
    }

    for spec in schema.required().filter(|s| parsed.contains(&s.name)) {
        if let Some(missing) = spec.includes.iter().find(|i| !parsed.contains(i)) {
            return Err(ConstraintError::Inclusion {
                argument: spec.name.clone(),
                missing: missing.clone(),
            }
            .into());
        }
    }

    if let Some(spec) = schema.required().find(|s| !parsed.contains(&s.name)) {
        return Err(ConstraintError::MissingRequired(spec.name.clone()).into());
    }

    for spec in schema.iter().filter(|s| !s.required) {
        if let Some(default) = &spec.default_value
            && !parsed.contains(&spec.name)
        {
            tracing::debug!("Injecting default for {}", spec.name);
            parsed.insert(spec.name.clone(), default.clone());
        }
    }

    Ok(())
}
