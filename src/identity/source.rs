use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::input::OidInput;
use crate::error::AppError;

/// Fields that may carry a subject identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimField {
    /// Immutable identity-provider object id.
    Oid,
    /// Subject claim; some issuers only send this.
    Sub,
    /// Primary key of a persisted user record.
    Id,
}

impl ClaimField {
    pub const ALL: [ClaimField; 3] = [ClaimField::Oid, ClaimField::Sub, ClaimField::Id];

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimField::Oid => "oid",
            ClaimField::Sub => "sub",
            ClaimField::Id => "id",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ClaimField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        ClaimField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| AppError::user("unknown_claim_field".to_string(), format!("unknown identity field '{t}' (expected oid, sub or id)")))
    }
}

/// Anything an identifier can be pulled out of: token payloads, user rows, principals.
/// Read-only; implementations only look a field up, they never interpret it.
pub trait IdentitySource {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput>;
}

impl IdentitySource for Value {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        // Non-object JSON (null, strings, arrays...) carries no fields
        self.as_object()?.field(field)
    }
}

impl IdentitySource for Map<String, Value> {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        self.get(field.as_str()).map(|v| v as &dyn OidInput)
    }
}

impl IdentitySource for HashMap<String, Value> {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        self.get(field.as_str()).map(|v| v as &dyn OidInput)
    }
}

impl IdentitySource for HashMap<String, String> {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        self.get(field.as_str()).map(|v| v as &dyn OidInput)
    }
}

impl<S: IdentitySource> IdentitySource for Option<S> {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        self.as_ref()?.field(field)
    }
}

impl<S: IdentitySource + ?Sized> IdentitySource for &S {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> { (**self).field(field) }
}

/// Non-string claims read as absent instead of failing the payload.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A single string becomes a one-element list; non-string entries are dropped.
fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => vec![s],
        Value::Array(items) => items.into_iter().filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }).collect(),
        _ => Vec::new(),
    })
}

/// Identity-relevant subset of an IdP token payload.
///
/// `oid`/`sub` stay as raw JSON so unexpected shapes deserialize fine and are
/// rejected later by normalization. The descriptive claims are read leniently for
/// the same reason: a malformed `roles` or `email` must not hide the identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    #[serde(default)]
    pub oid: Option<Value>,
    #[serde(default)]
    pub sub: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub preferred_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentitySource for TokenClaims {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        match field {
            ClaimField::Oid => self.oid.as_ref().map(|v| v as &dyn OidInput),
            ClaimField::Sub => self.sub.as_ref().map(|v| v as &dyn OidInput),
            ClaimField::Id => self.extra.field(field),
        }
    }
}

/// A persisted user row as handed back by the user store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub oid: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, alias = "displayName", deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentitySource for UserRecord {
    fn field(&self, field: ClaimField) -> Option<&dyn OidInput> {
        match field {
            ClaimField::Oid => self.oid.as_ref().map(|v| v as &dyn OidInput),
            ClaimField::Id => self.id.as_ref().map(|v| v as &dyn OidInput),
            ClaimField::Sub => self.extra.field(field),
        }
    }
}
