//! Plain entity types and the immutable `InstanceModel` that owns them.

use crate::EntityId;

/// A room. Capacity is time-independent (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: EntityId,
    pub capacity: u32,
}

/// An operating theatre. `availability[day]` is in minutes. Index 0 in the
/// indexer is always the synthetic dummy OT reserved for occupants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingTheatre {
    pub id: EntityId,
    pub availability: Vec<u32>,
}

/// A surgeon. `max_surgery_time[day]` is in minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surgeon {
    pub id: EntityId,
    pub max_surgery_time: Vec<u32>,
}

/// A patient already hospitalised at day 0. Their placement (room, length of
/// stay) is fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub id: EntityId,
    pub gender: Gender,
    pub age_group: u32,
    pub length_of_stay: u32,
    /// Indexed by shift offset from admission day: `workload_produced[s]` is
    /// the workload contributed on shift `admission_day * S + s`.
    pub workload_produced: Vec<u32>,
    pub skill_level_required: Vec<u32>,
    pub room: EntityId,
}

/// An opaque gender label taken verbatim from the instance file.
///
/// The IHTP wire format does not fix a vocabulary (real datasets use both
/// `"male"`/`"female"` and anonymised `"A"`/`"B"` labels) — only equality
/// matters for H1 (gender mix) and S1 (mixed-age room), so this is a thin
/// string wrapper rather than a fixed two-variant enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gender(pub String);

/// An elective patient. Extends the occupant fields with the surgical
/// planning and admission-window fields from `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: EntityId,
    pub mandatory: bool,
    pub gender: Gender,
    pub age_group: u32,
    pub length_of_stay: u32,
    pub surgery_release_day: u32,
    /// Present iff `mandatory` (`spec.md` §3).
    pub surgery_due_day: Option<u32>,
    pub surgery_duration: u32,
    pub surgeon: EntityId,
    pub incompatible_rooms: Vec<EntityId>,
    pub workload_produced: Vec<u32>,
    pub skill_level_required: Vec<u32>,
}

/// A single working shift a nurse is available for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingShift {
    pub day: u32,
    pub shift_offset: u32,
    pub max_load: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nurse {
    pub id: EntityId,
    pub skill_level: u32,
    pub working_shifts: Vec<WorkingShift>,
}

/// The eight soft-constraint weights (`spec.md` §4.6, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weights {
    pub room_mixed_age: u32,
    pub room_nurse_skill: u32,
    pub continuity_of_care: u32,
    pub nurse_excessive_workload: u32,
    pub open_operating_theatre: u32,
    pub surgeon_transfer: u32,
    pub patient_delay: u32,
    pub unscheduled_optional: u32,
}

/// The complete, immutable description of one IHTP instance.
///
/// Occupants and patients share one index space in [`crate::instance::Indexer`]:
/// occupants come first, followed by patients (`spec.md` §3, "Unified patient
/// index"). `occupants` and `patients` here are kept as separate vectors for
/// clarity; `patient_count()` / `occupant_count()` give the split.
#[derive(Debug, Clone)]
pub struct InstanceModel {
    pub days: u32,
    pub shift_types: Vec<String>,
    pub age_groups: Vec<String>,
    pub skill_levels: u32,
    pub weights: Weights,
    pub rooms: Vec<Room>,
    pub operating_theatres: Vec<OperatingTheatre>,
    pub surgeons: Vec<Surgeon>,
    pub occupants: Vec<Occupant>,
    pub patients: Vec<Patient>,
    pub nurses: Vec<Nurse>,
}

/// A read-only view over either kind of resident, addressed by its position
/// in the unified patient index (`spec.md` §3, "Unified patient index").
#[derive(Debug, Clone, Copy)]
pub enum UnifiedPatient<'a> {
    Occupant(&'a Occupant),
    Patient(&'a Patient),
}

impl<'a> UnifiedPatient<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            UnifiedPatient::Occupant(o) => &o.id,
            UnifiedPatient::Patient(p) => &p.id,
        }
    }

    pub fn gender(&self) -> &'a Gender {
        match self {
            UnifiedPatient::Occupant(o) => &o.gender,
            UnifiedPatient::Patient(p) => &p.gender,
        }
    }

    pub fn age_group(&self) -> u32 {
        match self {
            UnifiedPatient::Occupant(o) => o.age_group,
            UnifiedPatient::Patient(p) => p.age_group,
        }
    }

    pub fn length_of_stay(&self) -> u32 {
        match self {
            UnifiedPatient::Occupant(o) => o.length_of_stay,
            UnifiedPatient::Patient(p) => p.length_of_stay,
        }
    }

    pub fn workload_produced(&self) -> &'a [u32] {
        match self {
            UnifiedPatient::Occupant(o) => &o.workload_produced,
            UnifiedPatient::Patient(p) => &p.workload_produced,
        }
    }

    pub fn skill_level_required(&self) -> &'a [u32] {
        match self {
            UnifiedPatient::Occupant(o) => &o.skill_level_required,
            UnifiedPatient::Patient(p) => &p.skill_level_required,
        }
    }

    /// Occupants are always considered mandatory: they are already admitted
    /// and cannot transition back to unscheduled (`spec.md` §4, "state
    /// machine").
    pub fn mandatory(&self) -> bool {
        match self {
            UnifiedPatient::Occupant(_) => true,
            UnifiedPatient::Patient(p) => p.mandatory,
        }
    }
}

impl InstanceModel {
    /// Number of shift types per day (`S` in `spec.md` §3).
    pub fn shifts_per_day(&self) -> u32 {
        self.shift_types.len() as u32
    }

    /// Total number of shifts, `D * S`.
    pub fn shift_count(&self) -> u32 {
        self.days * self.shifts_per_day()
    }

    /// Linearises `(day, shift_offset)` into a single shift index.
    pub fn shift_index(&self, day: u32, shift_offset: u32) -> u32 {
        day * self.shifts_per_day() + shift_offset
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Number of entries in the unified patient index (occupants + patients).
    pub fn unified_patient_count(&self) -> usize {
        self.occupant_count() + self.patient_count()
    }

    /// Resolves a unified patient index to its occupant or patient record.
    ///
    /// Panics if `idx` is out of range; callers only ever pass indices
    /// handed out by [`super::Indexer`] for `EntityKind::Patients`.
    pub fn unified(&self, idx: usize) -> UnifiedPatient<'_> {
        if idx < self.occupant_count() {
            UnifiedPatient::Occupant(&self.occupants[idx])
        } else {
            UnifiedPatient::Patient(&self.patients[idx - self.occupant_count()])
        }
    }
}
