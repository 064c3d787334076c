//! Errors raised while applying a tentative move to the working state
//! (`spec.md` §7).

use thiserror::Error;

/// A hard-constraint violation discovered while tentatively applying a
/// move. Recoverable: the driver catches this, rolls the probe back, and
/// discards the candidate (`spec.md` §4.9 step 3a, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("room {room} would mix genders on day {day}")]
    GenderMismatch { day: u32, room: usize },

    #[error("room {room} is incompatible with this patient")]
    IncompatibleRoom { room: usize },

    #[error("room {room} would exceed capacity on day {day}")]
    RoomCapacityExceeded { day: u32, room: usize },

    #[error("day {day} is outside the patient's admission window")]
    AdmissionWindowViolation { day: u32 },

    #[error("surgeon {surgeon} would exceed available time on day {day}")]
    SurgeonOvertime { day: u32, surgeon: usize },

    #[error("operating theatre {ot} would exceed available time on day {day}")]
    OtOvertime { day: u32, ot: usize },

    #[error("room {room} has no nurse coverage on day {day}")]
    RoomNotCovered { day: u32, room: usize },

    #[error("room {room} is already covered by another nurse on shift {shift}")]
    RoomAlreadyCovered { shift: u32, room: usize },

    #[error("unassigning this nurse would leave occupied room {room} uncovered on shift {shift}")]
    UncoversOccupiedRoom { shift: u32, room: usize },
}

/// An internal state disagreement that must never arise from a
/// well-formed [`crate::moves::MoveGenerator`] candidate. Fatal: the caller
/// aborts rather than recovering (`spec.md` §7, *InvariantError*).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("patient {patient} is already admitted")]
    PatientAlreadyScheduled { patient: usize },

    #[error("patient {patient} is not currently admitted")]
    PatientNotScheduled { patient: usize },

    #[error("nurse {nurse} is already assigned to room {room} on shift {shift}")]
    NurseAlreadyAssigned { shift: u32, room: usize, nurse: usize },

    #[error("nurse {nurse} is not assigned to room {room} on shift {shift}")]
    NurseNotAssigned { shift: u32, room: usize, nurse: usize },
}

/// Raised by [`super::SnapshotStore`] when asked to restore a snapshot it
/// never took.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no snapshot has been taken yet")]
    Empty,
}

/// The two ways a tentative apply can fail: a recoverable hard-constraint
/// violation, or a fatal internal inconsistency.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}
