//! Errors raised while resolving IDs/indices or loading an instance.

use thiserror::Error;

use super::indexer::EntityKind;

/// Fatal at load time (`spec.md` §7, `InputError`), and also used by
/// [`super::Indexer`] for lookup failures that should never occur once an
/// instance has loaded successfully.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("unknown {kind:?} id: {id}")]
    UnknownId { kind: EntityKind, id: String },

    #[error("index {index} out of range for {kind:?}")]
    BadIndex { kind: EntityKind, index: usize },

    #[error("malformed instance: {0}")]
    Malformed(String),

    #[error("{field} has length {actual}, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("cross-reference to unknown {kind:?} id: {id}")]
    DanglingReference { kind: EntityKind, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_display() {
        let e = InstanceError::UnknownId {
            kind: EntityKind::Rooms,
            id: "r9".to_string(),
        };
        assert!(e.to_string().contains("r9"));
    }

    #[test]
    fn length_mismatch_display() {
        let e = InstanceError::LengthMismatch {
            field: "operating_theaters[0].availability".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            e.to_string(),
            "operating_theaters[0].availability has length 2, expected 3"
        );
    }
}
