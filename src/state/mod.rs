//! The three decision tensors (`spec.md` §3) plus the `EngineState`
//! coordinator that keeps them mutually consistent.

pub mod error;
pub mod nra;
pub mod pas;
pub mod scp;
pub mod snapshot;

pub use error::{ActionError, EngineError, InvariantError, SnapshotError};
pub use nra::{NRAState, ResidentDemand};
pub use pas::PASState;
pub use scp::SCPState;
pub use snapshot::SnapshotStore;

use crate::instance::{EntityKind, Indexer, InstanceModel};

/// Dummy OT is always registered first by `instance::loader` (`spec.md`
/// §3, "Index 0 is a synthetic dummy OT").
pub const DUMMY_OT: usize = 0;

/// Owns the three decision tensors and the small amount of per-patient
/// lookup data (surgeon, incompatible rooms) needed to apply a move without
/// re-querying the indexer on every candidate (`spec.md` §9, "EngineState").
#[derive(Debug, Clone)]
pub struct EngineState {
    pub days: u32,
    pub shifts_per_day: u32,
    pub room_count: usize,
    pub ot_count: usize,
    pub surgeon_count: usize,
    pub patient_count: usize,
    pub nurse_count: usize,
    pub occupant_count: usize,

    pub pas: PASState,
    pub scp: SCPState,
    pub nra: NRAState,

    /// Indexed by real-patient position (unified index minus
    /// `occupant_count`).
    patient_surgeon: Vec<usize>,
    patient_incompatible_rooms: Vec<Vec<usize>>,
}

impl EngineState {
    /// Builds an empty engine (all tensors zero) and then seeds the
    /// occupants, which are born `SCHEDULED` and never transition
    /// (`spec.md` §4, "state machine (patient)").
    pub fn new(model: &InstanceModel, indexer: &Indexer) -> Self {
        let shift_count = model.shift_count();
        let room_count = model.rooms.len();
        let ot_count = model.operating_theatres.len();
        let surgeon_count = model.surgeons.len();
        let patient_count = model.unified_patient_count();
        let nurse_count = model.nurses.len();
        let occupant_count = model.occupant_count();

        let patient_surgeon = model
            .patients
            .iter()
            .map(|p| indexer.by_id(EntityKind::Surgeons, &p.surgeon).unwrap())
            .collect();
        let patient_incompatible_rooms = model
            .patients
            .iter()
            .map(|p| {
                p.incompatible_rooms
                    .iter()
                    .map(|r| indexer.by_id(EntityKind::Rooms, r).unwrap())
                    .collect()
            })
            .collect();

        let mut engine = Self {
            days: model.days,
            shifts_per_day: model.shifts_per_day(),
            room_count,
            ot_count,
            surgeon_count,
            patient_count,
            nurse_count,
            occupant_count,
            pas: PASState::new(model.days, room_count, patient_count),
            scp: SCPState::new(model.days, patient_count, surgeon_count, ot_count),
            nra: NRAState::new(shift_count, room_count, nurse_count),
            patient_surgeon,
            patient_incompatible_rooms,
        };
        engine.seed_occupants(model, indexer);
        engine
    }

    fn seed_occupants(&mut self, model: &InstanceModel, indexer: &Indexer) {
        for (idx, occupant) in model.occupants.iter().enumerate() {
            let room = indexer.by_id(EntityKind::Rooms, &occupant.room).unwrap();
            self.pas
                .schedule_interval(0, room, idx, occupant.length_of_stay);
        }
        // Occupants never require surgery, so SCP stays untouched for them;
        // demand views still need refreshing for every occupied day/room.
        for room in 0..self.room_count {
            for day in 0..self.days {
                if !self.pas.room_empty(day, room) {
                    self.refresh_demand(model, day, room);
                }
            }
        }
    }

    /// Room indices this (non-occupant) patient cannot be placed in.
    pub fn incompatible_rooms(&self, patient: usize) -> &[usize] {
        &self.patient_incompatible_rooms[patient - self.occupant_count]
    }

    fn surgeon_of(&self, patient: usize) -> usize {
        self.patient_surgeon[patient - self.occupant_count]
    }

    /// Recomputes `workloadReq`/`skillReq` for every shift of `day` in
    /// `room` from the currently present residents.
    fn refresh_demand(&mut self, model: &InstanceModel, day: u32, room: usize) {
        let residents: Vec<Vec<ResidentDemand>> = self
            .pas
            .residents_at(day, room)
            .into_iter()
            .map(|p| self.resident_demand_for_day(model, p, day))
            .collect();
        self.nra
            .recompute_demand(day, self.shifts_per_day, room, &residents);
    }

    /// `p`'s per-shift-offset workload/skill contribution on `day`, aligned
    /// so index 0 is the first shift of `day` (`spec.md` §4.4).
    fn resident_demand_for_day(&self, model: &InstanceModel, p: usize, day: u32) -> Vec<ResidentDemand> {
        let (admission_day, _) = self
            .pas
            .lookup_schedule(p)
            .expect("resident returned by residents_at must be scheduled");
        let profile = model.unified(p);
        let base = (day - admission_day) as usize * self.shifts_per_day as usize;
        (0..self.shifts_per_day as usize)
            .map(|s| ResidentDemand {
                workload: profile.workload_produced().get(base + s).copied().unwrap_or(0),
                skill_required: profile
                    .skill_level_required()
                    .get(base + s)
                    .copied()
                    .unwrap_or(0),
            })
            .collect()
    }

    fn gender_ok_over_interval(
        &self,
        model: &InstanceModel,
        day: u32,
        end: u32,
        room: usize,
        patient: usize,
    ) -> bool {
        let gender = model.unified(patient).gender();
        (day..end).all(|d| {
            self.pas
                .residents_at(d, room)
                .iter()
                .all(|&other| model.unified(other).gender() == gender)
        })
    }

    fn capacity_ok_over_interval(&self, day: u32, end: u32, room: usize, capacity: u32) -> bool {
        (day..end).all(|d| self.pas.residents_at(d, room).len() as u32 + 1 <= capacity)
    }

    /// Tentatively commits `ScheduleAdmission(day, room, patient, ot)`,
    /// checking H1/H2/H3/H4/H6/H7/H8 in turn (`spec.md` §4.5).
    pub fn schedule_admission(
        &mut self,
        model: &InstanceModel,
        day: u32,
        room: usize,
        patient: usize,
        ot: usize,
    ) -> Result<(), EngineError> {
        if self.pas.is_scheduled(patient) {
            return Err(InvariantError::PatientAlreadyScheduled { patient }.into());
        }
        let real = &model.patients[patient - self.occupant_count];
        let length = real.length_of_stay;
        let end = self.days.min(day + length);
        let surgeon = self.surgeon_of(patient);

        if !PASState::admission_window_ok(day, real.surgery_release_day, real.surgery_due_day) {
            return Err(ActionError::AdmissionWindowViolation { day }.into());
        }
        if !PASState::room_compatible(room, self.incompatible_rooms(patient)) {
            return Err(ActionError::IncompatibleRoom { room }.into());
        }
        if !self.gender_ok_over_interval(model, day, end, room, patient) {
            return Err(ActionError::GenderMismatch { day, room }.into());
        }
        if !self.capacity_ok_over_interval(day, end, room, model.rooms[room].capacity) {
            return Err(ActionError::RoomCapacityExceeded { day, room }.into());
        }
        if !self.nra.coverage_ok(day, end, self.shifts_per_day, room) {
            return Err(ActionError::RoomNotCovered { day, room }.into());
        }
        if !self.scp.surgeon_overtime_ok(
            day,
            surgeon,
            real.surgery_duration,
            model.surgeons[surgeon].max_surgery_time[day as usize],
        ) {
            return Err(ActionError::SurgeonOvertime { day, surgeon }.into());
        }
        if ot != DUMMY_OT
            && !self.scp.ot_overtime_ok(
                day,
                ot,
                real.surgery_duration,
                model.operating_theatres[ot].availability[day as usize],
            )
        {
            return Err(ActionError::OtOvertime { day, ot }.into());
        }

        self.pas.schedule_interval(day, room, patient, length);
        self.scp
            .schedule_surgery(day, patient, surgeon, ot, real.surgery_duration);
        for d in day..end {
            self.refresh_demand(model, d, room);
        }
        Ok(())
    }

    /// Tentatively commits `UnscheduleAdmission(day, room, patient, ot)`.
    /// The fields are the patient's *current* placement (`spec.md` §4.7);
    /// no hard constraint can be violated by removing a patient.
    pub fn unschedule_admission(
        &mut self,
        model: &InstanceModel,
        patient: usize,
    ) -> Result<(), EngineError> {
        let (day, room) = self
            .pas
            .lookup_schedule(patient)
            .ok_or(InvariantError::PatientNotScheduled { patient })?;
        let real = &model.patients[patient - self.occupant_count];
        let end = self.days.min(day + real.length_of_stay);

        self.pas.unschedule_patient(patient);
        self.scp.unschedule(patient);
        for d in day..end {
            self.refresh_demand(model, d, room);
        }
        Ok(())
    }

    /// Tentatively commits `AssignNurse(shift, room, nurse)`. Rejects a
    /// room already covered by a different nurse, preserving I11.
    pub fn assign_nurse(
        &mut self,
        shift: u32,
        room: usize,
        nurse: usize,
    ) -> Result<(), EngineError> {
        if self.nra.is_assigned(shift, room, nurse) {
            return Err(InvariantError::NurseAlreadyAssigned { shift, room, nurse }.into());
        }
        if self.nra.assigned_nurse(shift, room).is_some() {
            return Err(ActionError::RoomAlreadyCovered { shift, room }.into());
        }
        self.nra.assign_nurse(shift, room, nurse);
        Ok(())
    }

    /// Tentatively commits `UnassignNurse(shift, room, nurse)`. Rejects
    /// uncovering a room that currently has residents (`spec.md` §9, Open
    /// Questions — resolved: reject explicitly rather than rely on a
    /// downstream coverage failure).
    pub fn unassign_nurse(
        &mut self,
        shift: u32,
        room: usize,
        nurse: usize,
    ) -> Result<(), EngineError> {
        if !self.nra.is_assigned(shift, room, nurse) {
            return Err(InvariantError::NurseNotAssigned { shift, room, nurse }.into());
        }
        let day = shift / self.shifts_per_day;
        if !self.pas.room_empty(day, room) {
            return Err(ActionError::UncoversOccupiedRoom { shift, room }.into());
        }
        self.nra.unassign_nurse(shift, room, nurse);
        Ok(())
    }

    /// Unassigns a nurse without the H8 coverage guard. Only valid for
    /// reverting a probe that itself just assigned this nurse — never for
    /// committing a real `UnassignNurse` move (use [`Self::unassign_nurse`]
    /// for that).
    pub fn force_unassign_nurse(&mut self, shift: u32, room: usize, nurse: usize) {
        self.nra.unassign_nurse(shift, room, nurse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::load_from_str;

    fn fixture(json: &str) -> (InstanceModel, Indexer) {
        load_from_str(json).unwrap()
    }

    const BASE: &str = r#"
    {
        "days": 2,
        "skill_levels": 2,
        "shift_types": ["early", "late"],
        "age_groups": ["adult"],
        "weights": {
            "room_mixed_age": 1, "room_nurse_skill": 1, "continuity_of_care": 1,
            "nurse_eccessive_workload": 1, "open_operating_theater": 1,
            "surgeon_transfer": 1, "patient_delay": 1, "unscheduled_optional": 10
        },
        "rooms": [{"id": "r1", "capacity": 1}],
        "operating_theaters": [{"id": "ot1", "availability": [120, 120]}],
        "surgeons": [{"id": "s1", "max_surgery_time": [120, 120]}],
        "patients": [{
            "id": "p1", "mandatory": false, "gender": "A", "age_group": "adult",
            "length_of_stay": 1, "surgery_release_day": 0, "surgery_duration": 60,
            "surgeon_id": "s1", "workload_produced": [1, 1], "skill_level_required": [1, 1]
        }],
        "nurses": [{
            "id": "n1", "skill_level": 2,
            "working_shifts": [{"day": 0, "shift": 0, "max_load": 5}, {"day": 0, "shift": 1, "max_load": 5}]
        }]
    }"#;

    #[test]
    fn schedule_admission_rejected_without_coverage() {
        let (model, indexer) = fixture(BASE);
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let err = engine.schedule_admission(&model, 0, room, patient, ot).unwrap_err();
        assert!(matches!(err, EngineError::Action(ActionError::RoomNotCovered { .. })));
    }

    #[test]
    fn schedule_admission_succeeds_with_coverage() {
        let (model, indexer) = fixture(BASE);
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.assign_nurse(1, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();

        assert!(engine.pas.is_scheduled(patient));
        assert_eq!(engine.scp.lookup(patient), Some((0, 0, ot, 60)));
    }

    #[test]
    fn unschedule_then_schedule_leaves_state_consistent() {
        let (model, indexer) = fixture(BASE);
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.assign_nurse(1, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();
        engine.unschedule_admission(&model, patient).unwrap();

        assert!(!engine.pas.is_scheduled(patient));
        assert_eq!(engine.scp.lookup(patient), None);
    }

    #[test]
    fn unassign_nurse_rejected_while_room_occupied() {
        let (model, indexer) = fixture(BASE);
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.assign_nurse(1, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();

        let err = engine.unassign_nurse(0, room, nurse).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Action(ActionError::UncoversOccupiedRoom { .. })
        ));
    }

    #[test]
    fn double_schedule_is_an_invariant_error() {
        let (model, indexer) = fixture(BASE);
        let mut engine = EngineState::new(&model, &indexer);
        let room = indexer.by_id(EntityKind::Rooms, "r1").unwrap();
        let ot = indexer.by_id(EntityKind::OperatingTheatres, "ot1").unwrap();
        let patient = indexer.by_id(EntityKind::Patients, "p1").unwrap();
        let nurse = indexer.by_id(EntityKind::Nurses, "n1").unwrap();

        engine.assign_nurse(0, room, nurse).unwrap();
        engine.assign_nurse(1, room, nurse).unwrap();
        engine.schedule_admission(&model, 0, room, patient, ot).unwrap();

        let err = engine.schedule_admission(&model, 0, room, patient, ot).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Invariant(InvariantError::PatientAlreadyScheduled { .. })
        ));
    }
}
