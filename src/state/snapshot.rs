//! Save / restore of the three state tensors as one atomic "best-seen"
//! triple (`spec.md` §4.10).

use super::error::SnapshotError;
use super::{NRAState, PASState, SCPState};

/// Holds exactly one snapshot: the best feasible triple seen so far.
/// `save` is called only on a strict penalty improvement (`spec.md` §4.9
/// step 5); `restore` is called once, at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    best: Option<(PASState, SCPState, NRAState)>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Deep-copies the three tensors, replacing any previous snapshot.
    pub fn save(&mut self, pas: &PASState, scp: &SCPState, nra: &NRAState) {
        self.best = Some((pas.clone(), scp.clone(), nra.clone()));
    }

    pub fn has_snapshot(&self) -> bool {
        self.best.is_some()
    }

    /// Returns the saved triple, if any has been taken.
    pub fn restore(&self) -> Result<(PASState, SCPState, NRAState), SnapshotError> {
        self.best.clone().ok_or(SnapshotError::Empty)
    }
}
