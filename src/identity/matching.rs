use tracing::{debug, warn};

use super::extract::{extract_with, ExtractionPolicy};
use super::input::OidInput;
use super::oid::{normalize, ObjectIdentifier};
use super::source::IdentitySource;
use crate::error::{AppError, AppResult};

/// `true` iff both values normalize and the canonical forms are identical.
/// Two unusable values are never equal.
pub fn equal<A, B>(a: &A, b: &B) -> bool
where
    A: OidInput + ?Sized,
    B: OidInput + ?Sized,
{
    match (normalize(a), normalize(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Outcome of checking a presented token against the stored user it claims to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Matched(ObjectIdentifier),
    Mismatch { claimed: ObjectIdentifier, stored: ObjectIdentifier },
    /// The token carries no usable identifier.
    MissingClaim,
    /// The token is fine but the record has nothing to compare against.
    MissingRecord { claimed: ObjectIdentifier },
}

impl Reconciliation {
    pub fn is_match(&self) -> bool { matches!(self, Reconciliation::Matched(_)) }

    pub fn into_result(self) -> AppResult<ObjectIdentifier> {
        match self {
            Reconciliation::Matched(oid) => Ok(oid),
            Reconciliation::MissingClaim => Err(AppError::auth("missing_identity", "token carries no valid object identifier")),
            Reconciliation::MissingRecord { claimed } => Err(AppError::not_found(
                "identity_not_linked".to_string(),
                format!("no stored identity for {}", claimed.masked()),
            )),
            Reconciliation::Mismatch { claimed, stored } => Err(AppError::forbidden(
                "identity_mismatch".to_string(),
                format!("token subject {} does not match stored identity {}", claimed.masked(), stored.masked()),
            )),
        }
    }
}

/// Compares token claims with stored user records, each side under its own policy.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    pub token_policy: ExtractionPolicy,
    pub record_policy: ExtractionPolicy,
}

impl Reconciler {
    pub fn new(token_policy: ExtractionPolicy, record_policy: ExtractionPolicy) -> Self {
        Self { token_policy, record_policy }
    }

    pub fn reconcile<T, R>(&self, token: &T, record: &R) -> Reconciliation
    where
        T: IdentitySource + ?Sized,
        R: IdentitySource + ?Sized,
    {
        let Some(claimed) = extract_with(&self.token_policy, token) else {
            debug!(target: "identity_normalizer::reconcile", "token has no usable identity");
            return Reconciliation::MissingClaim;
        };
        let Some(stored) = extract_with(&self.record_policy, record) else {
            debug!(target: "identity_normalizer::reconcile", claimed = %claimed.masked(), "record has no usable identity");
            return Reconciliation::MissingRecord { claimed };
        };
        if claimed == stored {
            debug!(target: "identity_normalizer::reconcile", oid = %claimed.masked(), "identity matched");
            Reconciliation::Matched(claimed)
        } else {
            warn!(target: "identity_normalizer::reconcile", claimed = %claimed.masked(), stored = %stored.masked(), "identity mismatch");
            Reconciliation::Mismatch { claimed, stored }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const A: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";
    const B: &str = "b2c3d4e5-f6a7-8901-bcde-f12345678901";

    #[test]
    fn equal_is_normalization_aware() {
        assert!(equal("A1B2C3D4-E5F6-7890-ABCD-EF1234567890", A));
        assert!(equal(&format!(" {A} "), A));
        assert!(!equal(A, B));
    }

    #[test]
    fn invalid_inputs_are_never_equal() {
        assert!(!equal("not-a-guid", "not-a-guid"));
        assert!(!equal(&json!(null), &json!(null)));
        assert!(!equal(&None::<&str>, A));
        assert!(!equal(&json!(1), &json!(1)));
    }

    #[test]
    fn reconcile_outcomes() {
        let r = Reconciler::default();
        assert!(r.reconcile(&json!({ "oid": A }), &json!({ "oid": A.to_uppercase() })).is_match());
        assert_eq!(r.reconcile(&json!({ "sub": "x" }), &json!({ "oid": A })), Reconciliation::MissingClaim);
        assert!(matches!(r.reconcile(&json!({ "oid": A }), &json!({})), Reconciliation::MissingRecord { .. }));
        assert!(matches!(r.reconcile(&json!({ "oid": A }), &json!({ "id": B })), Reconciliation::Mismatch { .. }));
    }

    #[test]
    fn into_result_maps_statuses() {
        let r = Reconciler::default();
        let ok = r.reconcile(&json!({ "oid": A }), &json!({ "id": A })).into_result().unwrap();
        assert_eq!(ok.as_str(), A);
        let e = r.reconcile(&json!({}), &json!({ "id": A })).into_result().unwrap_err();
        assert_eq!(e.http_status(), 401);
        let e = r.reconcile(&json!({ "oid": A }), &json!({ "id": 3 })).into_result().unwrap_err();
        assert_eq!(e.http_status(), 404);
        let e = r.reconcile(&json!({ "oid": A }), &json!({ "id": B })).into_result().unwrap_err();
        assert_eq!(e.http_status(), 403);
        assert!(!e.message().contains(A));
        assert!(!e.message().contains(B));
    }
}
