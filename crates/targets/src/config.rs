//! Run configuration — the explicit parameter map supplied at run start.
//!
//! Defined here (in the targets crate) so both the engine and individual body
//! implementations can import it without a circular dependency.

use std::collections::HashMap;

use serde_json::Value;

/// Read-only parameter map for one run.
///
/// Supplied once when a run starts and never mutated afterwards; there is no
/// ambient/global configuration state.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    values: HashMap<String, Value>,
}

impl RunConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for test and setup code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up a raw parameter value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether a required parameter is usable: the key exists and the value
    /// is neither JSON `null` nor an empty string.
    pub fn is_set(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Loose boolean reading of a parameter, used for condition gates
    /// driven by a single flag (`--param publish=true`).
    ///
    /// `false`, `"false"`, `"0"`, `""`, `null` and a missing key all read as
    /// false; any other value reads as true.
    pub fn truthy(&self, key: &str) -> bool {
        match self.values.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty() && s != "false" && s != "0",
            Some(_) => true,
        }
    }
}

impl FromIterator<(String, Value)> for RunConfig {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_null_and_empty_string_are_not_set() {
        let cfg = RunConfig::new()
            .with("null", Value::Null)
            .with("empty", "")
            .with("token", "s3cr3t")
            .with("count", 0);

        assert!(!cfg.is_set("absent"));
        assert!(!cfg.is_set("null"));
        assert!(!cfg.is_set("empty"));
        assert!(cfg.is_set("token"));
        // A present non-string value counts, even if it is zero/false-y.
        assert!(cfg.is_set("count"));
    }

    #[test]
    fn truthy_reads_flag_parameters() {
        let cfg = RunConfig::new()
            .with("yes", "true")
            .with("no", "false")
            .with("zero", "0")
            .with("flag", true)
            .with("obj", json!({ "k": 1 }));

        assert!(cfg.truthy("yes"));
        assert!(!cfg.truthy("no"));
        assert!(!cfg.truthy("zero"));
        assert!(!cfg.truthy("missing"));
        assert!(cfg.truthy("flag"));
        assert!(cfg.truthy("obj"));
    }
}
