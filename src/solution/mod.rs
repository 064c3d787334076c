//! Solution output: serialises a committed [`crate::state::EngineState`]
//! back to the JSON solution schema of `spec.md` §6.

pub mod dto;
pub mod writer;

pub use dto::{AdmissionDay, NurseAssignmentDto, NurseSolutionDto, PatientSolutionDto, SolutionDto};
pub use writer::build;

use crate::instance::{Indexer, InstanceModel};
use crate::state::EngineState;

/// Builds the solution and renders it as pretty-printed JSON text.
pub fn to_json_string(
    model: &InstanceModel,
    indexer: &Indexer,
    engine: &EngineState,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build(model, indexer, engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::load_from_str;

    #[test]
    fn to_json_string_round_trips_through_serde_value() {
        let json = r#"
        {
            "days": 1, "skill_levels": 1, "shift_types": ["early"], "age_groups": ["adult"],
            "weights": {
                "room_mixed_age": 1, "room_nurse_skill": 1, "continuity_of_care": 1,
                "nurse_eccessive_workload": 1, "open_operating_theater": 1,
                "surgeon_transfer": 1, "patient_delay": 1, "unscheduled_optional": 10
            },
            "rooms": [{"id": "r1", "capacity": 1}],
            "operating_theaters": [{"id": "ot1", "availability": [60]}],
            "surgeons": [{"id": "s1", "max_surgery_time": [60]}]
        }"#;
        let (model, indexer) = load_from_str(json).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let rendered = to_json_string(&model, &indexer, &engine).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value["patients"].as_array().unwrap().is_empty());
        assert!(value["nurses"].as_array().unwrap().is_empty());
    }
}
