//! Enumerates the full legal neighbourhood under the current state
//! (`spec.md` §4.8). Candidates are not hard-constraint screened here —
//! that happens when `state::EngineState` tentatively applies each one.

use super::Move;
use crate::instance::InstanceModel;
use crate::state::{EngineState, DUMMY_OT};

/// Stateless neighbourhood enumerator.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// The combined patient- and nurse-move neighbourhood, in a stable,
    /// insertion-like order (the driver's first-min tie-break depends on
    /// this order being deterministic).
    pub fn candidates(&self, model: &InstanceModel, engine: &EngineState) -> Vec<Move> {
        let mut moves = self.patient_moves(model, engine);
        moves.extend(self.nurse_moves(model, engine));
        moves
    }

    fn patient_moves(&self, model: &InstanceModel, engine: &EngineState) -> Vec<Move> {
        let mut moves = Vec::new();

        let any_mandatory_unscheduled = model.patients.iter().enumerate().any(|(i, p)| {
            p.mandatory && !engine.pas.is_scheduled(engine.occupant_count + i)
        });

        for (i, patient) in model.patients.iter().enumerate() {
            let idx = engine.occupant_count + i;

            if engine.pas.is_scheduled(idx) {
                let (day, room) = engine.pas.lookup_schedule(idx).unwrap();
                let (_, _, ot, _) = engine.scp.lookup(idx).unwrap();
                moves.push(Move::UnscheduleAdmission { day, room, patient: idx, ot });
                continue;
            }

            if !patient.mandatory && any_mandatory_unscheduled {
                continue;
            }

            let last_day = match patient.surgery_due_day {
                Some(due) => due.min(model.days.saturating_sub(1)),
                None => model.days.saturating_sub(1),
            };
            if patient.surgery_release_day > last_day {
                continue;
            }

            for day in patient.surgery_release_day..=last_day {
                for room in 0..engine.room_count {
                    if !engine.incompatible_rooms(idx).contains(&room) {
                        for ot in 0..engine.ot_count {
                            if ot != DUMMY_OT {
                                moves.push(Move::ScheduleAdmission { day, room, patient: idx, ot });
                            }
                        }
                    }
                }
            }
        }
        moves
    }

    fn nurse_moves(&self, model: &InstanceModel, engine: &EngineState) -> Vec<Move> {
        let mut moves = Vec::new();
        for (nurse, profile) in model.nurses.iter().enumerate() {
            for working_shift in &profile.working_shifts {
                let shift = model.shift_index(working_shift.day, working_shift.shift_offset);
                for room in 0..engine.room_count {
                    if engine.nra.is_assigned(shift, room, nurse) {
                        moves.push(Move::UnassignNurse { shift, room, nurse });
                    } else {
                        moves.push(Move::AssignNurse { shift, room, nurse });
                    }
                }
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::load_from_str;

    const BASE: &str = r#"
    {
        "days": 2,
        "skill_levels": 1,
        "shift_types": ["early"],
        "age_groups": ["adult"],
        "weights": {
            "room_mixed_age": 1, "room_nurse_skill": 1, "continuity_of_care": 1,
            "nurse_eccessive_workload": 1, "open_operating_theater": 1,
            "surgeon_transfer": 1, "patient_delay": 1, "unscheduled_optional": 10
        },
        "rooms": [{"id": "r1", "capacity": 1}],
        "operating_theaters": [{"id": "ot1", "availability": [60, 60]}],
        "surgeons": [{"id": "s1", "max_surgery_time": [60, 60]}],
        "patients": [
            {
                "id": "mandatory1", "mandatory": true, "gender": "A", "age_group": "adult",
                "length_of_stay": 1, "surgery_release_day": 0, "surgery_due_day": 1,
                "surgery_duration": 30, "surgeon_id": "s1",
                "workload_produced": [1], "skill_level_required": [1]
            },
            {
                "id": "optional1", "mandatory": false, "gender": "A", "age_group": "adult",
                "length_of_stay": 1, "surgery_release_day": 0,
                "surgery_duration": 30, "surgeon_id": "s1",
                "workload_produced": [1], "skill_level_required": [1]
            }
        ],
        "nurses": [{
            "id": "n1", "skill_level": 2,
            "working_shifts": [{"day": 0, "shift": 0, "max_load": 5}]
        }]
    }"#;

    #[test]
    fn mandatory_first_filtering_suppresses_optional_moves() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let candidates = MoveGenerator::new().candidates(&model, &engine);

        let optional_idx = indexer
            .by_id(crate::instance::EntityKind::Patients, "optional1")
            .unwrap();
        assert!(!candidates.iter().any(|m| matches!(
            m,
            Move::ScheduleAdmission { patient, .. } if *patient == optional_idx
        )));
    }

    #[test]
    fn scheduled_patient_only_yields_an_unschedule_move() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(crate::instance::EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(crate::instance::EntityKind::OperatingTheatres, "ot1").unwrap();
        let nurse = indexer.by_id(crate::instance::EntityKind::Nurses, "n1").unwrap();
        let mandatory = indexer
            .by_id(crate::instance::EntityKind::Patients, "mandatory1")
            .unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, mandatory, ot).unwrap();

        let candidates = MoveGenerator::new().candidates(&model, &engine);
        let for_mandatory: Vec<_> = candidates
            .iter()
            .filter(|m| match m {
                Move::ScheduleAdmission { patient, .. } | Move::UnscheduleAdmission { patient, .. } => {
                    *patient == mandatory
                }
                _ => false,
            })
            .collect();
        assert_eq!(for_mandatory.len(), 1);
        assert!(matches!(for_mandatory[0], Move::UnscheduleAdmission { .. }));
    }

    #[test]
    fn nurse_moves_cover_every_working_shift_and_room() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let candidates = MoveGenerator::new().candidates(&model, &engine);
        let nurse_moves = candidates
            .iter()
            .filter(|m| matches!(m, Move::AssignNurse { .. } | Move::UnassignNurse { .. }))
            .count();
        // 1 nurse * 1 working shift * 1 room.
        assert_eq!(nurse_moves, 1);
    }
}
