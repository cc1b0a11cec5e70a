//! # Tokenizer
//!
//! Splits a raw argument vector into the switches that were present and the
//! `(name, value)` pairs left over.
//!
//! Each declared switch is looked up by exact match and only its first
//! occurrence is removed. The remaining tokens are then consumed two at a
//! time; an odd trailing token becomes a name with no value.

use crate::schema::Schema;

/// A `name value` pair taken from the argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub name: String,
    /// `None` when the name was the last token.
    pub value: Option<String>,
}

impl RawPair {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Switch names found, in schema order.
    pub switches: Vec<String>,
    /// Remaining tokens paired by position.
    pub pairs: Vec<RawPair>,
}

impl Tokens {
    /// Every supplied name, switches first, then pair names in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.switches
            .iter()
            .map(String::as_str)
            .chain(self.pairs.iter().map(|p| p.name.as_str()))
    }
}

pub fn tokenize<I, S>(schema: &Schema, args: I) -> Tokens
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut remaining: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut switches = Vec::new();

    for spec in schema.switches() {
        if let Some(idx) = remaining.iter().position(|t| *t == spec.name) {
            remaining.remove(idx);
            switches.push(spec.name.clone());
        }
    }

    let mut pairs = Vec::with_capacity(remaining.len().div_ceil(2));
    let mut iter = remaining.into_iter();
    while let Some(name) = iter.next() {
        pairs.push(RawPair {
            name,
            value: iter.next(),
        });
    }

    tracing::debug!(
        "Tokenized {} switch(es) and {} pair(s)",
        switches.len(),
        pairs.len()
    );

    Tokens { switches, pairs }
}
