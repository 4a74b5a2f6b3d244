//! Identity-provider object identifier (OID) handling.
//! Keep the public surface thin and split implementation across sub-modules.
//!
//! Every operation here is pure and total: malformed, missing or wrongly typed
//! input resolves to `None`, `false` or a redaction marker, never a panic.
//! Callers decide what "no usable identity" means for them.

mod oid;
mod input;
mod source;
mod extract;
mod matching;
mod mask;
mod principal;

pub use oid::{ObjectIdentifier, ParseOidError, OID_PATTERN, validate, normalize, normalize_str};
pub use input::OidInput;
pub use source::{ClaimField, IdentitySource, TokenClaims, UserRecord};
pub use extract::{ExtractionPolicy, Located, extract, extract_with, locate, require_identity};
pub use matching::{equal, Reconciler, Reconciliation};
pub use mask::{mask_for_logging, Masked, INVALID_MARKER, FULL_MASK};
pub use principal::{Principal, Attrs};
