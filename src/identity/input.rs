use serde_json::Value;

use super::oid::ObjectIdentifier;

/// A value that arrived from outside (token claim, stored record, request parameter)
/// and may or may not be a string.
///
/// `as_oid_candidate` returns the string payload when the value is string-typed and
/// `None` for everything else (null, numbers, arrays, objects, absent values).
/// Nothing is validated at this layer.
pub trait OidInput {
    fn as_oid_candidate(&self) -> Option<&str>;
}

impl OidInput for str {
    fn as_oid_candidate(&self) -> Option<&str> { Some(self) }
}

impl OidInput for String {
    fn as_oid_candidate(&self) -> Option<&str> { Some(self.as_str()) }
}

impl OidInput for Value {
    fn as_oid_candidate(&self) -> Option<&str> { self.as_str() }
}

impl OidInput for ObjectIdentifier {
    fn as_oid_candidate(&self) -> Option<&str> { Some(self.as_str()) }
}

impl<T: OidInput> OidInput for Option<T> {
    fn as_oid_candidate(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.as_oid_candidate())
    }
}

impl<T: OidInput + ?Sized> OidInput for &T {
    fn as_oid_candidate(&self) -> Option<&str> { (**self).as_oid_candidate() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_strings_are_candidates() {
        assert_eq!(json!("abc").as_oid_candidate(), Some("abc"));
        assert_eq!(json!(12345).as_oid_candidate(), None);
        assert_eq!(json!(null).as_oid_candidate(), None);
        assert_eq!(json!(["a"]).as_oid_candidate(), None);
        assert_eq!(json!({"oid": "a"}).as_oid_candidate(), None);
        assert_eq!(json!(true).as_oid_candidate(), None);
    }

    #[test]
    fn options_and_references_delegate() {
        let none: Option<&str> = None;
        assert_eq!(none.as_oid_candidate(), None);
        assert_eq!(Some("x").as_oid_candidate(), Some("x"));
        let s = String::from("y");
        assert_eq!((&s).as_oid_candidate(), Some("y"));
        assert_eq!(Some(json!(1)).as_oid_candidate(), None);
    }
}
