//! The eight soft-constraint penalty functions and their weighted total
//! (`spec.md` §4.6).

use std::collections::HashSet;

use crate::instance::InstanceModel;
use crate::state::{EngineState, DUMMY_OT};

/// Per-rule contributions, each already multiplied by its configured weight
/// (`spec.md` §4.6: "Each returns a non-negative integer multiplied by the
/// configured weight"). P7 (`spec.md` §8): summing the eight fields must
/// equal [`PenaltyEvaluator::evaluate`]'s `total` for any weight
/// configuration, not just the unit weights a fixture happens to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltyBreakdown {
    pub room_mixed_age: u32,
    pub room_nurse_skill: u32,
    pub continuity_of_care: u32,
    pub nurse_excessive_workload: u32,
    pub open_operating_theatre: u32,
    pub surgeon_transfer: u32,
    pub patient_delay: u32,
    pub unscheduled_optional: u32,
}

impl PenaltyBreakdown {
    /// The sum of the eight already-weighted fields, i.e. the objective
    /// value the driver minimises.
    pub fn total(&self) -> u32 {
        self.room_mixed_age
            + self.room_nurse_skill
            + self.continuity_of_care
            + self.nurse_excessive_workload
            + self.open_operating_theatre
            + self.surgeon_transfer
            + self.patient_delay
            + self.unscheduled_optional
    }
}

/// Stateless evaluator: scores a committed [`EngineState`] against an
/// [`InstanceModel`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PenaltyEvaluator;

impl PenaltyEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Returns `(total, breakdown)`: each breakdown field is its raw count
    /// multiplied by the matching `model.weights` entry, and `total` is
    /// their sum (`spec.md` §4.6, P7).
    pub fn evaluate(&self, model: &InstanceModel, engine: &EngineState) -> (u32, PenaltyBreakdown) {
        let w = &model.weights;
        let breakdown = PenaltyBreakdown {
            room_mixed_age: self.room_mixed_age(model, engine) * w.room_mixed_age,
            room_nurse_skill: self.room_nurse_skill(model, engine) * w.room_nurse_skill,
            continuity_of_care: self.continuity_of_care(model, engine) * w.continuity_of_care,
            nurse_excessive_workload: self.nurse_excessive_workload(model, engine)
                * w.nurse_excessive_workload,
            open_operating_theatre: self.open_operating_theatre(engine) * w.open_operating_theatre,
            surgeon_transfer: self.surgeon_transfer(engine) * w.surgeon_transfer,
            patient_delay: self.patient_delay(model, engine) * w.patient_delay,
            unscheduled_optional: self.unscheduled_optional(model, engine) * w.unscheduled_optional,
        };
        (breakdown.total(), breakdown)
    }

    /// S1: `ageMax - ageMin` per occupied `(day, room)`.
    fn room_mixed_age(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        let mut total = 0;
        for day in 0..engine.days {
            for room in 0..engine.room_count {
                let residents = engine.pas.residents_at(day, room);
                if residents.is_empty() {
                    continue;
                }
                let ages: Vec<u32> = residents.iter().map(|&p| model.unified(p).age_group()).collect();
                total += ages.iter().max().unwrap() - ages.iter().min().unwrap();
            }
        }
        total
    }

    /// S2: positive gap between a covered room's skill demand and the
    /// covering nurse's skill.
    fn room_nurse_skill(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        let mut total = 0;
        for shift in 0..engine.shifts_per_day * engine.days {
            for room in 0..engine.room_count {
                if let Some(nurse) = engine.nra.assigned_nurse(shift, room) {
                    let required = engine.nra.skill_req(shift, room);
                    let has = model.nurses[nurse].skill_level;
                    total += required.saturating_sub(has);
                }
            }
        }
        total
    }

    /// S3: distinct nurses covering each patient's room across its stay.
    fn continuity_of_care(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        let mut total = 0;
        for patient in 0..model.unified_patient_count() {
            let Some((day, room)) = engine.pas.lookup_schedule(patient) else {
                continue;
            };
            let length = model.unified(patient).length_of_stay();
            let end = engine.days.min(day + length);
            let mut nurses = HashSet::new();
            for d in day..end {
                for offset in 0..engine.shifts_per_day {
                    let shift = d * engine.shifts_per_day + offset;
                    if let Some(nurse) = engine.nra.assigned_nurse(shift, room) {
                        nurses.insert(nurse);
                    }
                }
            }
            total += nurses.len() as u32;
        }
        total
    }

    /// S4: positive gap between a covered room's workload demand and the
    /// covering nurse's max load on that shift.
    fn nurse_excessive_workload(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        let mut total = 0;
        for shift in 0..engine.shifts_per_day * engine.days {
            for room in 0..engine.room_count {
                if let Some(nurse) = engine.nra.assigned_nurse(shift, room) {
                    let required = engine.nra.workload_req(shift, room);
                    let max_load = model
                        .nurses
                        .get(nurse)
                        .and_then(|n| n.working_shifts.iter().find(|w| {
                            w.day * engine.shifts_per_day + w.shift_offset == shift
                        }))
                        .map_or(0, |w| w.max_load);
                    total += required.saturating_sub(max_load);
                }
            }
        }
        total
    }

    /// S5: one per `(day, OT)` with `OT != dummy` and at least one patient.
    fn open_operating_theatre(&self, engine: &EngineState) -> u32 {
        let mut total = 0;
        for day in 0..engine.days {
            for ot in 0..engine.ot_count {
                if ot == DUMMY_OT {
                    continue;
                }
                let has_patient = (0..engine.patient_count)
                    .any(|p| (0..engine.surgeon_count).any(|s| engine.scp.get(day, p, s, ot) > 0));
                if has_patient {
                    total += 1;
                }
            }
        }
        total
    }

    /// S6: `+1` per `(surgeon, OT, day)` triple beyond a surgeon's first OT
    /// that day (`spec.md` §4.6, the reference's simpler formulation;
    /// documented in `DESIGN.md`).
    fn surgeon_transfer(&self, engine: &EngineState) -> u32 {
        let mut total = 0;
        for day in 0..engine.days {
            for surgeon in 0..engine.surgeon_count {
                let distinct_ots = engine.scp.surgeon_ots_on_day(day, surgeon, DUMMY_OT).len() as u32;
                total += distinct_ots.saturating_sub(1);
            }
        }
        total
    }

    /// S7: `admissionDay - releaseDay` for every scheduled non-occupant.
    fn patient_delay(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        let mut total = 0;
        for (i, patient) in model.patients.iter().enumerate() {
            let idx = model.occupant_count() + i;
            if let Some((day, _)) = engine.pas.lookup_schedule(idx) {
                total += day - patient.surgery_release_day;
            }
        }
        total
    }

    /// S8: count of optional, unscheduled patients.
    fn unscheduled_optional(&self, model: &InstanceModel, engine: &EngineState) -> u32 {
        model
            .patients
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                !p.mandatory && !engine.pas.is_scheduled(model.occupant_count() + i)
            })
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{load_from_str, EntityKind};

    const BASE: &str = r#"
    {
        "days": 1,
        "skill_levels": 2,
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
    fn empty_state_has_zero_penalty_plus_unscheduled_optional() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let (total, breakdown) = PenaltyEvaluator::new().evaluate(&model, &engine);
        // unscheduled_optional's weight is 10 in BASE, so the field itself
        // already carries the weighted contribution, not the raw count of 1.
        assert_eq!(breakdown.unscheduled_optional, 10);
        assert_eq!(total, 10);
    }

    #[test]
    fn scheduling_the_patient_clears_unscheduled_optional() {
        let (model, indexer) = load_from_str(BASE).unwrap();
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();

        let (total, breakdown) = PenaltyEvaluator::new().evaluate(&model, &engine);
        assert_eq!(breakdown.unscheduled_optional, 0);
        assert_eq!(total, 0);
    }

    // P7 (`spec.md` §8): breakdown fields sum to `total` even when weights
    // are all distinct (not just 1, and not just the 10 `BASE` happens to
    // use for `unscheduled_optional`), and each field already carries its
    // own weight rather than a raw, unweighted count.
    const NON_UNIT_WEIGHTS: &str = r#"
    {
        "days": 1,
        "skill_levels": 2,
        "shift_types": ["early"],
        "age_groups": ["adult"],
        "weights": {
            "room_mixed_age": 3, "room_nurse_skill": 2, "continuity_of_care": 4,
            "nurse_eccessive_workload": 5, "open_operating_theater": 6,
            "surgeon_transfer": 7, "patient_delay": 8, "unscheduled_optional": 9
        },
        "rooms": [{"id": "r1", "capacity": 1}],
        "operating_theaters": [{"id": "ot1", "availability": [60]}],
        "surgeons": [{"id": "s1", "max_surgery_time": [60]}],
        "patients": [{
            "id": "p1", "mandatory": false, "gender": "A", "age_group": "adult",
            "length_of_stay": 1, "surgery_release_day": 0, "surgery_duration": 30,
            "surgeon_id": "s1", "workload_produced": [1], "skill_level_required": [1]
        }]
    }"#;

    #[test]
    fn breakdown_field_carries_its_own_weight_not_a_raw_count() {
        let (model, indexer) = load_from_str(NON_UNIT_WEIGHTS).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let (total, breakdown) = PenaltyEvaluator::new().evaluate(&model, &engine);

        // Raw count is 1 (one optional, unscheduled patient); the field
        // must report count * weight = 9, not the raw count.
        assert_eq!(breakdown.unscheduled_optional, 9);
        assert_eq!(total, 9);
    }

    #[test]
    fn breakdown_sums_to_total_for_arbitrary_weights() {
        let (model, indexer) = load_from_str(NON_UNIT_WEIGHTS).unwrap();
        let engine = EngineState::new(&model, &indexer);
        let (total, breakdown) = PenaltyEvaluator::new().evaluate(&model, &engine);
        assert_eq!(breakdown.total(), total);
    }
}
