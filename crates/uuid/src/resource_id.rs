//! Resource identifier type and identifier sources.

use crate::{UuidError, UuidResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Prefix used for bundle-internal references and entry `fullUrl` values.
const URN_PREFIX: &str = "urn:uuid:";

/// Synthetic identifier of one emitted resource.
///
/// Always displayed in canonical form (lowercase, hyphenated).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Both the bare form and the `urn:uuid:` form are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] for uppercase, unhyphenated, or otherwise
    /// malformed input.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let bare = input.strip_prefix(URN_PREFIX).unwrap_or(input);
        if !Self::is_canonical(bare) {
            return Err(UuidError::InvalidInput(format!(
                "identifier must be a lowercase hyphenated UUID, got: '{input}'"
            )));
        }
        Uuid::parse_str(bare)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid identifier '{input}': {e}")))
    }

    /// Returns true if `input` is a lowercase hyphenated UUID.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// The `urn:uuid:` form used for internal references.
    pub fn urn(&self) -> String {
        format!("{URN_PREFIX}{}", self.0.hyphenated())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A source of fresh synthetic identifiers.
///
/// Implementations must never hand out the same identifier twice and must be safe to share
/// between threads.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> ResourceId;
}

/// Mints random UUID v4 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> ResourceId {
        ResourceId(Uuid::new_v4())
    }
}

/// Mints identifiers from a counter: `00000000-0000-0000-0000-000000000001`, `...0002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> ResourceId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        ResourceId(Uuid::from_u128(u128::from(n)))
    }
}
