use serde::{Deserialize, Serialize};
use tracing::trace;

use super::mask::Masked;
use super::oid::{normalize, ObjectIdentifier};
use super::source::{ClaimField, IdentitySource};
use crate::error::{AppError, AppResult};

/// Ordered list of fields consulted when pulling an identifier out of a source.
/// The first field whose value *normalizes* wins; present-but-invalid fields are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ClaimField>", into = "Vec<ClaimField>")]
pub struct ExtractionPolicy {
    fields: Vec<ClaimField>,
}

impl Default for ExtractionPolicy {
    /// `oid`, then `sub`, then `id`.
    fn default() -> Self { Self { fields: ClaimField::ALL.to_vec() } }
}

impl ExtractionPolicy {
    /// Build from any ordering; later duplicates are dropped.
    pub fn new<I: IntoIterator<Item = ClaimField>>(fields: I) -> Self {
        let mut out: Vec<ClaimField> = Vec::new();
        for f in fields {
            if !out.contains(&f) { out.push(f); }
        }
        Self { fields: out }
    }

    /// Only IdP-issued claims; database primary keys are never treated as subjects.
    pub fn token_claims_only() -> Self { Self::new([ClaimField::Oid, ClaimField::Sub]) }

    pub fn fields(&self) -> &[ClaimField] { &self.fields }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

impl From<Vec<ClaimField>> for ExtractionPolicy {
    fn from(v: Vec<ClaimField>) -> Self { Self::new(v) }
}

impl From<ExtractionPolicy> for Vec<ClaimField> {
    fn from(p: ExtractionPolicy) -> Self { p.fields }
}

/// An extracted identifier together with the field that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub oid: ObjectIdentifier,
    pub field: ClaimField,
}

pub fn locate<S: IdentitySource + ?Sized>(policy: &ExtractionPolicy, source: &S) -> Option<Located> {
    for &field in policy.fields() {
        let Some(raw) = source.field(field) else { continue; };
        match normalize(raw) {
            Some(oid) => return Some(Located { oid, field }),
            None => {
                trace!(target: "identity_normalizer::extract", field = field.as_str(), value = %Masked(raw), "skipping unusable identity field");
            }
        }
    }
    None
}

pub fn extract_with<S: IdentitySource + ?Sized>(policy: &ExtractionPolicy, source: &S) -> Option<ObjectIdentifier> {
    locate(policy, source).map(|l| l.oid)
}

/// Canonical identifier from `source` using the default `oid → sub → id` chain.
pub fn extract<S: IdentitySource + ?Sized>(source: &S) -> Option<ObjectIdentifier> {
    extract_with(&ExtractionPolicy::default(), source)
}

/// Like [`extract_with`], but "no usable identity" becomes a 401-class error for `?` callers.
pub fn require_identity<S: IdentitySource + ?Sized>(policy: &ExtractionPolicy, source: &S) -> AppResult<ObjectIdentifier> {
    extract_with(policy, source).ok_or_else(|| {
        let wanted = policy.fields().iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ");
        AppError::auth("missing_identity".to_string(), format!("no valid object identifier in [{wanted}]"))
    })
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod extract_tests;
