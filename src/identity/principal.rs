use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::{locate, ExtractionPolicy};
use super::input::OidInput;
use super::source::{ClaimField, IdentitySource};
use super::oid::ObjectIdentifier;
use crate::tprintln;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attrs {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The authenticated caller, keyed by canonical object identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub oid: ObjectIdentifier,
    /// Which claim the identifier was taken from.
    pub source_field: ClaimField,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Principal {
    /// Build from a decoded token payload. `None` when no identifier can be extracted.
    pub fn from_claims(policy: &ExtractionPolicy, claims: &Value) -> Option<Self> {
        let located = locate(policy, claims)?;
        let text = |k: &str| claims.get(k).and_then(|v| v.as_str()).map(str::to_string);
        let roles = claims
            .get("roles")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|r| r.as_str()).map(str::to_string).collect())
            .unwrap_or_default();
        let attrs = Attrs {
            tenant_id: text("tid"),
            email: text("email").or_else(|| text("preferred_username")),
            display_name: text("name"),
        };
        tprintln!("principal.from_claims oid={} field={}", located.oid.masked(), located.field);
        Some(Principal { oid: located.oid, source_field: located.field, roles, attrs })
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

impl IdentitySource for Principal {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        match field {
            ClaimField::Oid => Some(&self.oid as &dyn OidInput),
            ClaimField::Sub | ClaimField::Id => None,
        }
    }
}
