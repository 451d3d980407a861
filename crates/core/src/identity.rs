//! Identity Deduplication Cache.
//!
//! One mapping per entity kind from natural business key to the synthetic identifier first
//! assigned to it. The cache is created empty at the start of a run, owned by the conversion
//! service and dropped at the end; there is no eviction.
//!
//! Check-and-insert happens under the kind's lock, so two concurrent first sightings of the
//! same key cannot both be reported as newly assigned.

use eps_types::NaturalKey;
use eps_uuid::ResourceId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Kinds of shared entity, each with its own key space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Practitioner,
    Organisation,
    Role,
    Patient,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Practitioner,
        EntityKind::Organisation,
        EntityKind::Role,
        EntityKind::Patient,
    ];

    fn index(self) -> usize {
        match self {
            EntityKind::Practitioner => 0,
            EntityKind::Organisation => 1,
            EntityKind::Role => 2,
            EntityKind::Patient => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Practitioner => "practitioner",
            EntityKind::Organisation => "organisation",
            EntityKind::Role => "role",
            EntityKind::Patient => "patient",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`IdentityCache::resolve_or_assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The identifier every reference to this entity must use.
    pub id: ResourceId,
    /// `true` on first sighting: the caller owns emitting the entity.
    pub newly_assigned: bool,
}

#[derive(Debug, Default)]
pub struct IdentityCache {
    maps: [Mutex<HashMap<NaturalKey, ResourceId>>; 4],
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the identifier already recorded for `key`, or record `fresh` and return it.
    ///
    /// A missing key never matches: the entity gets `fresh` and counts as newly assigned,
    /// and nothing is recorded.
    pub fn resolve_or_assign(
        &self,
        kind: EntityKind,
        key: Option<&NaturalKey>,
        fresh: ResourceId,
    ) -> Resolution {
        let Some(key) = key else {
            tracing::warn!(%kind, "empty natural key; assigning a fresh identifier");
            return Resolution {
                id: fresh,
                newly_assigned: true,
            };
        };

        let mut map = self.maps[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match map.entry(key.clone()) {
            Entry::Occupied(existing) => {
                tracing::debug!(%kind, key = %key, id = %existing.get(), "identity cache hit");
                Resolution {
                    id: *existing.get(),
                    newly_assigned: false,
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                Resolution {
                    id: fresh,
                    newly_assigned: true,
                }
            }
        }
    }

    /// Number of distinct keys recorded for `kind`.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.maps[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }
}
