//! Converts a committed [`EngineState`] into the [`SolutionDto`] wire shape
//! (`spec.md` §6). Kept outside the engine's dependency graph, same as
//! `instance::loader` (`SPEC_FULL.md` §9).

use super::dto::{AdmissionDay, NurseAssignmentDto, NurseSolutionDto, PatientSolutionDto, SolutionDto};
use crate::instance::{EntityKind, Indexer, InstanceModel};
use crate::state::EngineState;

/// Builds the solution document for every patient and nurse in `model`,
/// reading the final placements out of `engine`.
pub fn build(model: &InstanceModel, indexer: &Indexer, engine: &EngineState) -> SolutionDto {
    let patients = model
        .patients
        .iter()
        .enumerate()
        .map(|(i, patient)| build_patient(indexer, engine, i, patient))
        .collect();

    let nurses = model
        .nurses
        .iter()
        .enumerate()
        .map(|(n, nurse)| build_nurse(model, indexer, engine, n, nurse))
        .collect();

    SolutionDto { patients, nurses }
}

fn build_patient(
    indexer: &Indexer,
    engine: &EngineState,
    i: usize,
    patient: &crate::instance::Patient,
) -> PatientSolutionDto {
    let idx = engine.occupant_count + i;
    match engine.pas.lookup_schedule(idx) {
        Some((day, room)) => {
            let (_, _, ot, _) = engine
                .scp
                .lookup(idx)
                .expect("a PAS-scheduled patient must have a surgery placement (I2)");
            PatientSolutionDto {
                id: patient.id.clone(),
                admission_day: AdmissionDay::Day(day),
                room: Some(room_id(indexer, room)),
                operating_theater: Some(ot_id(indexer, ot)),
            }
        }
        None => PatientSolutionDto {
            id: patient.id.clone(),
            admission_day: AdmissionDay::None,
            room: None,
            operating_theater: None,
        },
    }
}

fn build_nurse(
    model: &InstanceModel,
    indexer: &Indexer,
    engine: &EngineState,
    n: usize,
    nurse: &crate::instance::Nurse,
) -> NurseSolutionDto {
    let assignments = nurse
        .working_shifts
        .iter()
        .map(|working_shift| {
            let shift = model.shift_index(working_shift.day, working_shift.shift_offset);
            let rooms = (0..engine.room_count)
                .filter(|&room| engine.nra.is_assigned(shift, room, n))
                .map(|room| room_id(indexer, room))
                .collect();
            NurseAssignmentDto {
                day: working_shift.day,
                shift: working_shift.shift_offset,
                rooms,
            }
        })
        .collect();

    NurseSolutionDto { id: nurse.id.clone(), assignments }
}

fn room_id(indexer: &Indexer, room: usize) -> String {
    indexer
        .by_index(EntityKind::Rooms, room)
        .expect("room index handed out by EngineState must be registered")
        .to_string()
}

fn ot_id(indexer: &Indexer, ot: usize) -> String {
    indexer
        .by_index(EntityKind::OperatingTheatres, ot)
        .expect("OT index handed out by EngineState must be registered")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::load_from_str;

    const BASE: &str = r#"
    {
        "days": 1,
        "skill_levels": 1,
        "shift_types": ["early"],
        "age_groups": ["adult"],
        "weights": {
            "room_mixed_age": 1, "room_nurse_skill": 1, "continuity_of_care": 1,
            "nurse_eccessive_workload": 1, "open_operating_theater": 1,
            "surgeon_transfer": 1, "patient_delay": 1, "unscheduled_optional": 10
        },
        "rooms": [{"id": "r1", "capacity": 1}],
        "operating_theaters": [{"id": "ot1", "availability": [60]}],
        "surgeons": [{"id": "s1", "max_surgery_time": [60]}],
        "patients": [{
            "id": "p1", "mandatory": false, "gender": "A", "age_group": "adult",
            "length_of_stay": 1, "surgery_release_day": 0, "surgery_duration": 30,
            "surgeon_id": "s1", "workload_produced": [1], "skill_level_required": [1]
        }],
        "nurses": [{
            "id": "n1", "skill_level": 2,
            "working_shifts": [{"day": 0, "shift": 0, "max_load": 5}]
        }]
    }"#;

    #[test]
    fn unscheduled_patient_reports_admission_day_none() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let solution = build(&model, &indexer, &engine);
        assert_eq!(solution.patients[0].admission_day, AdmissionDay::None);
        assert!(solution.patients[0].room.is_none());
    }

    #[test]
    fn scheduled_patient_reports_room_and_ot_ids() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();
        engine.assign_nurse(0, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();

        let solution = build(&model, &indexer, &engine);
        assert_eq!(solution.patients[0].admission_day, AdmissionDay::Day(0));
        assert_eq!(solution.patients[0].room.as_deref(), Some("r1"));
        assert_eq!(solution.patients[0].operating_theater.as_deref(), Some("ot1"));
    }

    #[test]
    fn nurse_assignments_list_one_entry_per_working_shift() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();
        engine.assign_nurse(0, room, nurse).unwrap();

        let solution = build(&model, &indexer, &engine);
        assert_eq!(solution.nurses[0].assignments.len(), 1);
        assert_eq!(solution.nurses[0].assignments[0].rooms, vec!["r1".to_string()]);
    }
}
