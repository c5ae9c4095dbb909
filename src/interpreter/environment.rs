use compact_str::CompactString;
use std::collections::HashMap;

use super::error::RuntimeErrorKind;

/// Assignments to this name are discarded, so reading it always fails.
pub const SINK: &str = "_";

/// Variable bindings for a single run.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<CompactString, f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value_of(&self, name: &str) -> Result<f64, RuntimeErrorKind> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeErrorKind::UndefinedVariable(name.into()))
    }

    pub fn assign(&mut self, name: &str, value: f64) {
        if name != SINK {
            self.values.insert(name.into(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
