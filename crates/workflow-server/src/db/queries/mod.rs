//! SQL for the workflow tables.
//!
//! Table names are qualified with a configured schema, so every query takes
//! a validated [`Schema`].

pub mod entity;
pub mod execution;
pub mod task;
pub mod workflow;

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid"));

/// A schema name checked to be a plain SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema(String);

impl Schema {
    pub fn new(name: &str) -> Result<Self, String> {
        if IDENTIFIER.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(format!("invalid schema name '{}'", name))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Quoted, schema-qualified table reference.
    ///
    /// `table` must come from a fixed set or have passed identifier
    /// validation; it is not escaped here.
    pub fn table(&self, table: &str) -> String {
        format!("\"{}\".\"{}\"", self.0, table)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self("public".to_string())
    }
}
