//! Hard-constraint auditing (`spec.md` §4.5).
//!
//! H1–H8 are primarily enforced *during* a move — `state::EngineState`'s
//! `schedule_admission`/`unschedule_admission`/`assign_nurse`/`unassign_nurse`
//! each raise an [`crate::state::ActionError`] the instant a candidate would
//! violate one. [`ConstraintChecker`] is the read-only complement: it walks
//! a whole committed state and reports every violation found, for solution
//! validation and the `P2` testable property rather than the move-scoring
//! hot path.

use crate::instance::InstanceModel;
use crate::state::{EngineState, DUMMY_OT};

/// One hard-constraint breach found while auditing a committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// H1: two residents of different gender share a room on some day.
    GenderMix { day: u32, room: usize },
    /// H2: a patient occupies a room listed in its incompatible set.
    IncompatibleRoom { room: usize, patient: usize },
    /// H3: a surgeon's committed minutes exceed their daily maximum.
    SurgeonOvertime { day: u32, surgeon: usize },
    /// H4: a (non-dummy) OT's committed minutes exceed its daily availability.
    OtOvertime { day: u32, ot: usize },
    /// H6: a patient's admission day falls outside `[releaseDay, dueDay]`.
    AdmissionWindow { patient: usize, day: u32 },
    /// H7: a room holds more residents than its capacity.
    RoomCapacity { day: u32, room: usize },
    /// H8: an occupied room has a shift with no nurse assigned.
    RoomNotCovered { day: u32, room: usize, shift: u32 },
}

/// Stateless auditor over an already-built [`EngineState`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintChecker;

impl ConstraintChecker {
    pub fn new() -> Self {
        Self
    }

    /// Every hard-constraint violation present in `engine`'s current
    /// tensors. An empty result means `engine` satisfies I1–I11.
    pub fn check_all(&self, model: &InstanceModel, engine: &EngineState) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_rooms(model, engine, &mut violations);
        self.check_surgeons(model, engine, &mut violations);
        self.check_operating_theatres(model, engine, &mut violations);
        self.check_admission_windows(model, engine, &mut violations);
        self.check_coverage(engine, &mut violations);
        violations
    }

    fn check_rooms(&self, model: &InstanceModel, engine: &EngineState, out: &mut Vec<Violation>) {
        for day in 0..engine.days {
            for room in 0..engine.room_count {
                let residents = engine.pas.residents_at(day, room);
                if residents.len() as u32 > model.rooms[room].capacity {
                    out.push(Violation::RoomCapacity { day, room });
                }
                if let Some(&first) = residents.first() {
                    let gender = model.unified(first).gender();
                    if residents.iter().any(|&p| model.unified(p).gender() != gender) {
                        out.push(Violation::GenderMix { day, room });
                    }
                }
                for &p in &residents {
                    if p >= engine.occupant_count {
                        let incompatible = &model.patients[p - engine.occupant_count].incompatible_rooms;
                        let room_id = &model.rooms[room].id;
                        if incompatible.iter().any(|r| r == room_id) {
                            out.push(Violation::IncompatibleRoom { room, patient: p });
                        }
                    }
                }
            }
        }
    }

    fn check_surgeons(&self, model: &InstanceModel, engine: &EngineState, out: &mut Vec<Violation>) {
        for day in 0..engine.days {
            for surgeon in 0..engine.surgeon_count {
                let minutes = engine.scp.surgeon_minutes(day, surgeon);
                if minutes > model.surgeons[surgeon].max_surgery_time[day as usize] {
                    out.push(Violation::SurgeonOvertime { day, surgeon });
                }
            }
        }
    }

    fn check_operating_theatres(
        &self,
        model: &InstanceModel,
        engine: &EngineState,
        out: &mut Vec<Violation>,
    ) {
        for day in 0..engine.days {
            for ot in 0..engine.ot_count {
                if ot == DUMMY_OT {
                    continue;
                }
                let minutes = engine.scp.ot_minutes(day, ot);
                if minutes > model.operating_theatres[ot].availability[day as usize] {
                    out.push(Violation::OtOvertime { day, ot });
                }
            }
        }
    }

    fn check_admission_windows(
        &self,
        model: &InstanceModel,
        engine: &EngineState,
        out: &mut Vec<Violation>,
    ) {
        for (i, patient) in model.patients.iter().enumerate() {
            let idx = engine.occupant_count + i;
            if let Some((day, _)) = engine.pas.lookup_schedule(idx) {
                if !crate::state::PASState::admission_window_ok(
                    day,
                    patient.surgery_release_day,
                    patient.surgery_due_day,
                ) {
                    out.push(Violation::AdmissionWindow { patient: idx, day });
                }
            }
        }
    }

    fn check_coverage(&self, engine: &EngineState, out: &mut Vec<Violation>) {
        for day in 0..engine.days {
            for room in 0..engine.room_count {
                if engine.pas.room_empty(day, room) {
                    continue;
                }
                for offset in 0..engine.shifts_per_day {
                    let shift = day * engine.shifts_per_day + offset;
                    if engine.nra.assigned_nurse(shift, room).is_none() {
                        out.push(Violation::RoomNotCovered { day, room, shift });
                    }
                }
            }
        }
    }
}
