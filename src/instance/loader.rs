//! Validates and resolves an [`InstanceDto`] into an [`InstanceModel`] plus
//! the [`Indexer`] that will be used for the whole search run.
//!
//! Kept outside the engine's dependency graph (`SPEC_FULL.md` §9): this is
//! the only module that touches `serde_json`.

use std::collections::HashMap;

use super::dto::InstanceDto;
use super::error::InstanceError;
use super::indexer::{EntityKind, Indexer};
use super::model::{
    Gender, InstanceModel, Nurse, Occupant, OperatingTheatre, Patient, Room, Surgeon, Weights,
    WorkingShift,
};
use crate::EntityId;

/// Synthetic dummy OT id, registered first so it always lands at index 0
/// (`spec.md` §3, "Index 0 is a synthetic dummy OT").
const DUMMY_OT_ID: &str = "__dummy_ot__";

/// Loads and validates one instance, returning the immutable model together
/// with the indexer built while registering its entities.
pub fn load(dto: &InstanceDto) -> Result<(InstanceModel, Indexer), InstanceError> {
    let mut indexer = Indexer::new();

    validate_lengths(dto)?;

    let rooms = load_rooms(dto, &mut indexer);
    let room_ids: HashMap<&str, ()> = rooms.iter().map(|r| (r.id.as_str(), ())).collect();

    let operating_theatres = load_operating_theatres(dto, &mut indexer);
    let surgeons = load_surgeons(dto, &mut indexer);
    let surgeon_ids: HashMap<&str, ()> = surgeons.iter().map(|s| (s.id.as_str(), ())).collect();

    let age_group_index = |name: &str| -> Result<u32, InstanceError> {
        dto.age_groups
            .iter()
            .position(|g| g == name)
            .map(|i| i as u32)
            .ok_or_else(|| InstanceError::Malformed(format!("unknown age group: {name}")))
    };

    let occupants = load_occupants(dto, &mut indexer, &room_ids, age_group_index)?;
    let patients = load_patients(
        dto,
        &mut indexer,
        &room_ids,
        &surgeon_ids,
        age_group_index,
    )?;
    let nurses = load_nurses(dto, &mut indexer);

    let weights = Weights {
        room_mixed_age: dto.weights.room_mixed_age,
        room_nurse_skill: dto.weights.room_nurse_skill,
        continuity_of_care: dto.weights.continuity_of_care,
        nurse_excessive_workload: dto.weights.nurse_eccessive_workload,
        open_operating_theatre: dto.weights.open_operating_theater,
        surgeon_transfer: dto.weights.surgeon_transfer,
        patient_delay: dto.weights.patient_delay,
        unscheduled_optional: dto.weights.unscheduled_optional,
    };

    let model = InstanceModel {
        days: dto.days,
        shift_types: dto.shift_types.clone(),
        age_groups: dto.age_groups.clone(),
        skill_levels: dto.skill_levels,
        weights,
        rooms,
        operating_theatres,
        surgeons,
        occupants,
        patients,
        nurses,
    };

    Ok((model, indexer))
}

fn validate_lengths(dto: &InstanceDto) -> Result<(), InstanceError> {
    let days = dto.days as usize;
    for (i, ot) in dto.operating_theaters.iter().enumerate() {
        if ot.availability.len() != days {
            return Err(InstanceError::LengthMismatch {
                field: format!("operating_theaters[{i}].availability"),
                expected: days,
                actual: ot.availability.len(),
            });
        }
    }
    for (i, s) in dto.surgeons.iter().enumerate() {
        if s.max_surgery_time.len() != days {
            return Err(InstanceError::LengthMismatch {
                field: format!("surgeons[{i}].max_surgery_time"),
                expected: days,
                actual: s.max_surgery_time.len(),
            });
        }
    }
    for p in &dto.patients {
        if p.mandatory && p.surgery_due_day.is_none() {
            return Err(InstanceError::Malformed(format!(
                "mandatory patient {} is missing surgery_due_day",
                p.id
            )));
        }
    }
    Ok(())
}

fn load_rooms(dto: &InstanceDto, indexer: &mut Indexer) -> Vec<Room> {
    dto.rooms
        .iter()
        .map(|r| {
            indexer.register(EntityKind::Rooms, r.id.clone());
            Room {
                id: r.id.clone(),
                capacity: r.capacity,
            }
        })
        .collect()
}

fn load_operating_theatres(dto: &InstanceDto, indexer: &mut Indexer) -> Vec<OperatingTheatre> {
    indexer.register(EntityKind::OperatingTheatres, DUMMY_OT_ID.to_string());
    let dummy = OperatingTheatre {
        id: DUMMY_OT_ID.to_string(),
        availability: vec![0; dto.days as usize],
    };
    std::iter::once(dummy)
        .chain(dto.operating_theaters.iter().map(|ot| {
            indexer.register(EntityKind::OperatingTheatres, ot.id.clone());
            OperatingTheatre {
                id: ot.id.clone(),
                availability: ot.availability.clone(),
            }
        }))
        .collect()
}

fn load_surgeons(dto: &InstanceDto, indexer: &mut Indexer) -> Vec<Surgeon> {
    dto.surgeons
        .iter()
        .map(|s| {
            indexer.register(EntityKind::Surgeons, s.id.clone());
            Surgeon {
                id: s.id.clone(),
                max_surgery_time: s.max_surgery_time.clone(),
            }
        })
        .collect()
}

fn load_occupants(
    dto: &InstanceDto,
    indexer: &mut Indexer,
    room_ids: &HashMap<&str, ()>,
    age_group_index: impl Fn(&str) -> Result<u32, InstanceError>,
) -> Result<Vec<Occupant>, InstanceError> {
    dto.occupants
        .iter()
        .map(|o| {
            if !room_ids.contains_key(o.room_id.as_str()) {
                return Err(InstanceError::DanglingReference {
                    kind: EntityKind::Rooms,
                    id: o.room_id.clone(),
                });
            }
            indexer.register(EntityKind::Patients, o.id.clone());
            Ok(Occupant {
                id: o.id.clone(),
                gender: Gender(o.gender.clone()),
                age_group: age_group_index(&o.age_group)?,
                length_of_stay: o.length_of_stay,
                workload_produced: o.workload_produced.clone(),
                skill_level_required: o.skill_level_required.clone(),
                room: o.room_id.clone(),
            })
        })
        .collect()
}

fn load_patients(
    dto: &InstanceDto,
    indexer: &mut Indexer,
    room_ids: &HashMap<&str, ()>,
    surgeon_ids: &HashMap<&str, ()>,
    age_group_index: impl Fn(&str) -> Result<u32, InstanceError>,
) -> Result<Vec<Patient>, InstanceError> {
    dto.patients
        .iter()
        .map(|p| {
            if !surgeon_ids.contains_key(p.surgeon_id.as_str()) {
                return Err(InstanceError::DanglingReference {
                    kind: EntityKind::Surgeons,
                    id: p.surgeon_id.clone(),
                });
            }
            let incompatible_rooms: Vec<EntityId> = p
                .incompatible_room_ids
                .iter()
                .map(|r| {
                    if !room_ids.contains_key(r.as_str()) {
                        return Err(InstanceError::DanglingReference {
                            kind: EntityKind::Rooms,
                            id: r.clone(),
                        });
                    }
                    Ok(r.clone())
                })
                .collect::<Result<_, _>>()?;

            indexer.register(EntityKind::Patients, p.id.clone());
            Ok(Patient {
                id: p.id.clone(),
                mandatory: p.mandatory,
                gender: Gender(p.gender.clone()),
                age_group: age_group_index(&p.age_group)?,
                length_of_stay: p.length_of_stay,
                surgery_release_day: p.surgery_release_day,
                surgery_due_day: p.surgery_due_day,
                surgery_duration: p.surgery_duration,
                surgeon: p.surgeon_id.clone(),
                incompatible_rooms,
                workload_produced: p.workload_produced.clone(),
                skill_level_required: p.skill_level_required.clone(),
            })
        })
        .collect()
}

fn load_nurses(dto: &InstanceDto, indexer: &mut Indexer) -> Vec<Nurse> {
    dto.nurses
        .iter()
        .map(|n| {
            indexer.register(EntityKind::Nurses, n.id.clone());
            Nurse {
                id: n.id.clone(),
                skill_level: n.skill_level,
                working_shifts: n
                    .working_shifts
                    .iter()
                    .map(|w| WorkingShift {
                        day: w.day,
                        shift_offset: w.shift,
                        max_load: w.max_load,
                    })
                    .collect(),
            }
        })
        .collect()
}
