//! Fragment identifier scheme.
//!
//! Ids are derived, never allocated: `derive(slot, parent)` is a pure
//! function of its inputs, so assembling the same graph twice yields the
//! same ids. This is what makes snapshot-style testing of whole views
//! possible.
//!
//! ## Determinism Guarantees
//!
//! - Same (slot, parent) → same id, across runs and platforms
//! - Distinct (slot, parent) pairs are assumed collision-free within one
//!   assembly run (64 bits of a SHA-256 digest)
//! - The reserved root id is never produced by derivation: derived ids
//!   carry a `frag-` prefix, the root id does not

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The single reserved identifier, assigned to the assembly entry point.
pub const ROOT_FRAGMENT_ID: &str = "root";

/// Prefix carried by every derived identifier.
const DERIVED_PREFIX: &str = "frag-";

/// Bytes of the SHA-256 digest kept in a derived identifier.
const DERIVED_DIGEST_BYTES: usize = 8;

/// Opaque identifier of one fragment in a view.
///
/// Exactly one value ([`FragmentId::root`]) is reserved for the traversal
/// root; every other id is produced by [`FragmentId::derive`]. Implements
/// `Ord` so fragment tables serialize in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(String);

impl FragmentId {
    /// The reserved root identifier.
    pub fn root() -> Self {
        Self(ROOT_FRAGMENT_ID.to_string())
    }

    /// Whether this is the reserved root identifier.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_FRAGMENT_ID
    }

    /// Derive the id of a child referenced under `slot` by the fragment
    /// identified by `parent`.
    ///
    /// Pure and deterministic: SHA-256 over `parent || "/" || slot`,
    /// truncated and hex-encoded into a short printable token.
    pub fn derive(slot: &str, parent: &FragmentId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(parent.0.as_bytes());
        hasher.update(b"/");
        hasher.update(slot.as_bytes());
        let digest = hasher.finalize();
        Self(format!(
            "{DERIVED_PREFIX}{}",
            hex::encode(&digest[..DERIVED_DIGEST_BYTES])
        ))
    }

    /// The id as a string token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a raw id token read back out of emitted content.
    pub(crate) fn from_raw(raw: String) -> Self {
        Self(raw)
    }
}

/// Whether a string token has the shape of a fragment id.
///
/// Used by the closure audit to pick id references out of emitted content.
pub(crate) fn looks_like_fragment_id(s: &str) -> bool {
    s == ROOT_FRAGMENT_ID || s.starts_with(DERIVED_PREFIX)
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for FragmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
