//! Instance loading: wire format, validation, and the resolved model used by
//! the rest of the engine (`spec.md` §3, §6).

pub mod dto;
pub mod error;
pub mod indexer;
pub mod loader;
pub mod model;

pub use dto::InstanceDto;
pub use error::InstanceError;
pub use indexer::{EntityKind, Indexer};
pub use model::{
    Gender, InstanceModel, Nurse, Occupant, OperatingTheatre, Patient, Room, Surgeon, Weights,
    WorkingShift,
};

/// Parses and validates a complete instance from its JSON text.
pub fn load_from_str(json: &str) -> Result<(InstanceModel, Indexer), InstanceError> {
    let dto: InstanceDto =
        serde_json::from_str(json).map_err(|e| InstanceError::Malformed(e.to_string()))?;
    loader::load(&dto)
}
