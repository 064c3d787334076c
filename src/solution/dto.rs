//! Wire format for the solved instance (`spec.md` §6). Built by
//! [`super::writer::build`] from a committed [`crate::state::EngineState`].

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Serialize)]
pub struct SolutionDto {
    pub patients: Vec<PatientSolutionDto>,
    pub nurses: Vec<NurseSolutionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientSolutionDto {
    pub id: String,
    pub admission_day: AdmissionDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_theater: Option<String>,
}

/// `int` when scheduled, the literal string `"none"` otherwise (`spec.md`
/// §6) — not a JSON `null`, so this is a hand-written [`Serialize`] rather
/// than `Option<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDay {
    Day(u32),
    None,
}

impl Serialize for AdmissionDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AdmissionDay::Day(day) => serializer.serialize_u32(*day),
            AdmissionDay::None => serializer.serialize_str("none"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NurseSolutionDto {
    pub id: String,
    pub assignments: Vec<NurseAssignmentDto>,
}

/// One entry per working shift (`spec.md` §6).
#[derive(Debug, Clone, Serialize)]
pub struct NurseAssignmentDto {
    pub day: u32,
    pub shift: u32,
    pub rooms: Vec<String>,
}
