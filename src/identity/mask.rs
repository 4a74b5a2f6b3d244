use std::fmt;

use super::input::OidInput;

/// Returned for values that are not string-typed at all.
pub const INVALID_MARKER: &str = "invalid-oid";
/// Returned for strings too short to reveal any part of.
pub const FULL_MASK: &str = "***";

const KEEP_HEAD: usize = 8;
const KEEP_TAIL: usize = 4;
const MIN_PARTIAL_LEN: usize = 12;

/// Redact an identifier-ish value for logging.
///
/// Non-strings become `"invalid-oid"`. Strings longer than 12 characters keep the
/// first 8 and last 4 characters around `"..."`; anything shorter (including the
/// empty string) becomes `"***"`. The value is not validated first, and lengths are
/// counted in characters so multi-byte input is never split.
pub fn mask_for_logging<T: OidInput + ?Sized>(value: &T) -> String {
    let Some(s) = value.as_oid_candidate() else { return INVALID_MARKER.to_string(); };
    let len = s.chars().count();
    if len <= MIN_PARTIAL_LEN {
        return FULL_MASK.to_string();
    }
    let head: String = s.chars().take(KEEP_HEAD).collect();
    let tail: String = s.chars().skip(len - KEEP_TAIL).collect();
    format!("{head}...{tail}")
}

/// `Display` adapter over [`mask_for_logging`], for tracing fields:
/// `debug!(oid = %Masked(&claim), "...")`.
pub struct Masked<'a, T: OidInput + ?Sized>(pub &'a T);

impl<T: OidInput + ?Sized> fmt::Display for Masked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask_for_logging(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guid_keeps_head_and_tail() {
        assert_eq!(mask_for_logging("a1b2c3d4-e5f6-7890-abcd-ef1234567890"), "a1b2c3d4...7890");
    }

    #[test]
    fn short_strings_fully_masked() {
        assert_eq!(mask_for_logging("short"), "***");
        assert_eq!(mask_for_logging(""), "***");
        // exactly 12 is not "exceeds 12"
        assert_eq!(mask_for_logging("abcdefghijkl"), "***");
        assert_eq!(mask_for_logging("abcdefghijklm"), "abcdefgh...jklm");
    }

    #[test]
    fn non_strings_are_marked_invalid() {
        assert_eq!(mask_for_logging(&json!(42)), "invalid-oid");
        assert_eq!(mask_for_logging(&json!(null)), "invalid-oid");
        assert_eq!(mask_for_logging(&None::<String>), "invalid-oid");
    }

    #[test]
    fn does_not_validate() {
        assert_eq!(mask_for_logging("not-a-guid-but-long"), "not-a-gu...long");
    }

    #[test]
    fn multibyte_is_not_split() {
        assert_eq!(mask_for_logging("ééééééééééééé"), "éééééééé...éééé");
    }

    #[test]
    fn display_adapter_matches() {
        let v = json!("a1b2c3d4-e5f6-7890-abcd-ef1234567890");
        assert_eq!(Masked(&v).to_string(), "a1b2c3d4...7890");
        assert_eq!(format!("{}", Masked("x")), "***");
    }
}
