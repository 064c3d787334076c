//! Bidirectional string-id ⇄ dense-index map per entity class.
//!
//! Mirrors `original_source/.../Hospital.py::Indexer`: entities are
//! registered in encounter order within their `EntityKind`, and the
//! `Occupants` kind is folded into `Patients` so occupants and patients share
//! one dense index space, matching `spec.md` §3's "Unified patient index".

use std::collections::HashMap;

use super::error::InstanceError;
use crate::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Rooms,
    OperatingTheatres,
    Surgeons,
    Nurses,
    Patients,
}

/// Registers entities of every [`EntityKind`] and resolves between their
/// stable string IDs and dense `usize` indices assigned in registration
/// order.
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    by_index: HashMap<EntityKind, Vec<EntityId>>,
    by_id: HashMap<EntityKind, HashMap<EntityId, usize>>,
}

/// `"occupants"` is an alias for `"patients"` (`spec.md` §4.1): callers pass
/// [`EntityKind::Patients`] for both, since occupants and patients share one
/// index space.
impl Indexer {
    pub fn new() -> Self {
        Self {
            by_index: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Registers `id` under `kind`, returning its newly assigned dense index.
    ///
    /// Registration order is the index order: the first call for a kind
    /// gets index 0, the second gets 1, and so on.
    pub fn register(&mut self, kind: EntityKind, id: impl Into<EntityId>) -> usize {
        let id = id.into();
        let indices = self.by_index.entry(kind).or_default();
        let idx = indices.len();
        indices.push(id.clone());
        self.by_id.entry(kind).or_default().insert(id, idx);
        idx
    }

    /// Resolves a dense index back to its string ID.
    pub fn by_index(&self, kind: EntityKind, idx: usize) -> Result<&str, InstanceError> {
        self.by_index
            .get(&kind)
            .and_then(|v| v.get(idx))
            .map(String::as_str)
            .ok_or(InstanceError::BadIndex { kind, index: idx })
    }

    /// Resolves a string ID to its dense index.
    pub fn by_id(&self, kind: EntityKind, id: &str) -> Result<usize, InstanceError> {
        self.by_id
            .get(&kind)
            .and_then(|m| m.get(id))
            .copied()
            .ok_or_else(|| InstanceError::UnknownId {
                kind,
                id: id.to_string(),
            })
    }

    /// Number of entities registered under `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.by_index.get(&kind).map_or(0, Vec::len)
    }
}
