//! Wire format for one IHTP instance (`spec.md` §6). Deserialised directly
//! from the instance JSON; `loader` turns this into an [`super::InstanceModel`]
//! plus [`super::Indexer`].

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDto {
    pub days: u32,
    pub skill_levels: u32,
    pub shift_types: Vec<String>,
    pub age_groups: Vec<String>,
    pub weights: WeightsDto,
    pub rooms: Vec<RoomDto>,
    pub operating_theaters: Vec<OperatingTheatreDto>,
    pub surgeons: Vec<SurgeonDto>,
    #[serde(default)]
    pub occupants: Vec<OccupantDto>,
    #[serde(default)]
    pub patients: Vec<PatientDto>,
    #[serde(default)]
    pub nurses: Vec<NurseDto>,
}

/// Note the wire format's `nurse_eccessive_workload` misspelling
/// (`spec.md` §6) — kept verbatim here; `loader` maps it onto the correctly
/// spelled internal `Weights::nurse_excessive_workload`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsDto {
    pub room_mixed_age: u32,
    pub room_nurse_skill: u32,
    pub continuity_of_care: u32,
    pub nurse_eccessive_workload: u32,
    pub open_operating_theater: u32,
    pub surgeon_transfer: u32,
    pub patient_delay: u32,
    pub unscheduled_optional: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomDto {
    pub id: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatingTheatreDto {
    pub id: String,
    pub availability: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurgeonDto {
    pub id: String,
    pub max_surgery_time: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OccupantDto {
    pub id: String,
    pub gender: String,
    pub age_group: String,
    pub length_of_stay: u32,
    pub workload_produced: Vec<u32>,
    pub skill_level_required: Vec<u32>,
    pub room_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientDto {
    pub id: String,
    pub mandatory: bool,
    pub gender: String,
    pub age_group: String,
    pub length_of_stay: u32,
    pub surgery_release_day: u32,
    #[serde(default)]
    pub surgery_due_day: Option<u32>,
    pub surgery_duration: u32,
    pub surgeon_id: String,
    #[serde(default)]
    pub incompatible_room_ids: Vec<String>,
    pub workload_produced: Vec<u32>,
    pub skill_level_required: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NurseDto {
    pub id: String,
    pub skill_level: u32,
    pub working_shifts: Vec<WorkingShiftDto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WorkingShiftDto {
    pub day: u32,
    pub shift: u32,
    pub max_load: u32,
}
