//! Runtime configuration for identity extraction.
//! Layered: built-in defaults, then an optional JSON file, then environment overrides.
//! Redaction is not configurable here; identifiers are masked unless `oidctl --reveal` is given.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::identity::{ClaimField, ExtractionPolicy, Reconciler};

pub const ENV_FIELDS: &str = "OID_FIELDS";
pub const ENV_RECORD_FIELDS: &str = "OID_RECORD_FIELDS";

/// Unknown keys are rejected so a misspelled policy key cannot silently leave the defaults in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Fields consulted on token payloads, in priority order.
    pub token_fields: ExtractionPolicy,
    /// Fields consulted on stored user records, in priority order.
    pub record_fields: ExtractionPolicy,
}

impl IdentityConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env_with(|k| std::env::var(k).ok())?;
        debug!(target: "identity_normalizer::config", token_fields = ?cfg.token_fields.fields(), record_fields = ?cfg.record_fields.fields(), "identity config loaded");
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            AppError::user("bad_config".to_string(), format!("{}: {}", path.display(), e))
        })
    }

    /// Apply overrides from a variable lookup (the real environment in `load`).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_FIELDS) {
            self.token_fields = parse_field_list(&v)?;
        }
        if let Some(v) = lookup(ENV_RECORD_FIELDS) {
            self.record_fields = parse_field_list(&v)?;
        }
        Ok(())
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.token_fields.clone(), self.record_fields.clone())
    }
}

/// `"oid, sub"` -> policy. Blank entries are ignored; unknown names are an error.
pub fn parse_field_list(s: &str) -> AppResult<ExtractionPolicy> {
    let fields = s
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.parse::<ClaimField>())
        .collect::<AppResult<Vec<_>>>()?;
    Ok(ExtractionPolicy::new(fields))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
