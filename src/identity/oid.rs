use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::OidInput;
use super::mask::mask_for_logging;

/// 8-4-4-4-12 hexadecimal GUID layout, either case, anchored on both ends.
/// Character classes are spelled out instead of using `(?i)` so that Unicode case
/// folding can never widen the accepted alphabet.
pub static OID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").unwrap()
});

/// Canonical identity-provider object identifier: trimmed, validated, lowercase.
///
/// The only ways to obtain one are [`normalize`], `FromStr`/`TryFrom<String>`
/// (which go through the same path) and `From<Uuid>`, so holding an
/// `ObjectIdentifier` means the value is already canonical and never needs
/// re-validation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectIdentifier(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseOidError {
    #[error("object identifier is empty")]
    Empty,
    #[error("object identifier is not a GUID: {masked}")]
    Malformed { masked: String },
}

impl ObjectIdentifier {
    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_string(self) -> String { self.0 }

    /// Redacted form suitable for logs.
    pub fn masked(&self) -> String { mask_for_logging(self.0.as_str()) }

    pub fn to_uuid(&self) -> Uuid {
        // OID_PATTERN only admits strings that are also hyphenated UUIDs
        Uuid::parse_str(&self.0).unwrap_or_else(|_| Uuid::nil())
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Debug output ends up in panic messages and `?` log fields; keep it redacted.
impl fmt::Debug for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectIdentifier({})", self.masked())
    }
}

impl AsRef<str> for ObjectIdentifier {
    fn as_ref(&self) -> &str { &self.0 }
}

impl Borrow<str> for ObjectIdentifier {
    fn borrow(&self) -> &str { &self.0 }
}

impl FromStr for ObjectIdentifier {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if trim_candidate(s).is_empty() {
            return Err(ParseOidError::Empty);
        }
        normalize(s).ok_or_else(|| ParseOidError::Malformed { masked: mask_for_logging(s) })
    }
}

impl TryFrom<String> for ObjectIdentifier {
    type Error = ParseOidError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl TryFrom<&str> for ObjectIdentifier {
    type Error = ParseOidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ObjectIdentifier> for String {
    fn from(oid: ObjectIdentifier) -> Self { oid.0 }
}

impl From<Uuid> for ObjectIdentifier {
    fn from(u: Uuid) -> Self {
        // Uuid's Display is the lowercase hyphenated form
        ObjectIdentifier(u.hyphenated().to_string())
    }
}

/// Surrounding whitespace plus U+FEFF, which `str::trim` keeps but clients that
/// paste identifiers from BOM-prefixed files or JavaScript `trim()` do not.
fn trim_candidate(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// `true` iff `value` is string-typed and, once trimmed, fully matches [`OID_PATTERN`].
pub fn validate<T: OidInput + ?Sized>(value: &T) -> bool {
    match value.as_oid_candidate() {
        Some(s) => OID_PATTERN.is_match(trim_candidate(s)),
        None => false,
    }
}

/// Trim, validate and lowercase. The single canonicalization point for the crate.
pub fn normalize<T: OidInput + ?Sized>(value: &T) -> Option<ObjectIdentifier> {
    let trimmed = trim_candidate(value.as_oid_candidate()?);
    if !OID_PATTERN.is_match(trimmed) {
        return None;
    }
    Some(ObjectIdentifier(trimmed.to_ascii_lowercase()))
}

/// [`normalize`] returning the canonical string directly.
pub fn normalize_str<T: OidInput + ?Sized>(value: &T) -> Option<String> {
    normalize(value).map(ObjectIdentifier::into_string)
}

#[cfg(test)]
#[path = "oid_tests.rs"]
mod oid_tests;
