pub mod identity;
pub mod config;
pub mod error;

pub use identity::{
    equal, extract, extract_with, locate, mask_for_logging, normalize, normalize_str,
    require_identity, validate, ClaimField, ExtractionPolicy, IdentitySource, Located, Masked,
    ObjectIdentifier, OidInput, ParseOidError, Principal, Reconciler, Reconciliation,
    TokenClaims, UserRecord,
};

// Debug-build printing helper: expands to eprintln! in tests/debug builds and is absent otherwise.
// Never pass a full identifier to it; use mask_for_logging / Masked.
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
