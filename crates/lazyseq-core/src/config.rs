//! Operator configuration that downstream crates can serialize/deserialize.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::join::{JoinOperation, JoinStrategy};

static GLOBAL: Lazy<SeqConfig> = Lazy::new(SeqConfig::from_env);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqConfig {
    pub buffer: BufferConfig,
    pub join: JoinConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Emit a warning once a consumer backlog (publish) or cache (memoize)
    /// grows past this many elements. `None` disables the check.
    pub backlog_warn_threshold: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Strategy used by the convenience joins when the caller does not pick one.
    pub default_strategy: JoinStrategy,

    pub default_operation: JoinOperation,

    /// Initial capacity of the hash join's right-side multimap.
    pub hash_capacity_hint: usize,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            default_strategy: JoinStrategy::Hash,
            default_operation: JoinOperation::Inner,
            hash_capacity_hint: 16,
        }
    }
}

impl SeqConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYSEQ_BACKLOG_WARN`: backlog warning threshold (elements)
    /// - `LAZYSEQ_JOIN_STRATEGY`: `loop`, `hash` or `merge`
    /// - `LAZYSEQ_JOIN_OPERATION`: `inner`, `left`, `right` or `full`
    /// - `LAZYSEQ_HASH_CAPACITY_HINT`: initial hash join capacity
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`. Unparseable
    /// values are ignored and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("LAZYSEQ_BACKLOG_WARN") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer.backlog_warn_threshold = Some(v);
            }
        }

        if let Some(s) = lookup("LAZYSEQ_JOIN_STRATEGY") {
            if let Ok(v) = s.parse::<JoinStrategy>() {
                cfg.join.default_strategy = v;
            }
        }

        if let Some(s) = lookup("LAZYSEQ_JOIN_OPERATION") {
            if let Ok(v) = s.parse::<JoinOperation>() {
                cfg.join.default_operation = v;
            }
        }

        if let Some(s) = lookup("LAZYSEQ_HASH_CAPACITY_HINT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.join.hash_capacity_hint = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Process-wide config, read from the environment on first use.
    pub fn global() -> &'static SeqConfig {
        &GLOBAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            ("LAZYSEQ_BACKLOG_WARN", "128"),
            ("LAZYSEQ_JOIN_STRATEGY", "MERGE"),
            ("LAZYSEQ_JOIN_OPERATION", "sideways"),
            ("LAZYSEQ_HASH_CAPACITY_HINT", "-3"),
        ]
        .into_iter()
        .collect();

        let cfg = SeqConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.buffer.backlog_warn_threshold, Some(128));
        assert_eq!(cfg.join.default_strategy, JoinStrategy::Merge);
        assert_eq!(cfg.join.default_operation, JoinOperation::Inner);
        assert_eq!(cfg.join.hash_capacity_hint, 16);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = SeqConfig::from_json(r#"{"join": {"default_strategy": "loop"}}"#).unwrap();
        assert_eq!(cfg.join.default_strategy, JoinStrategy::Loop);
        assert_eq!(cfg.join.hash_capacity_hint, 16);
        assert_eq!(cfg.buffer, BufferConfig::default());
        assert!(SeqConfig::from_json("{not json").is_err());
    }
}
