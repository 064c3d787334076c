//! The four move variants and their tabu-equality semantics (`spec.md`
//! §4.7).

pub mod generator;

pub use generator::MoveGenerator;

/// A single candidate step in the neighbourhood (`spec.md` §4.7).
///
/// `PartialEq` is hand-written rather than derived: admission moves compare
/// every field, but nurse moves deliberately ignore `shift` — an aggressive
/// tabu memory that the search relies on for diversification (`spec.md`
/// §9). Do not "fix" this to full-tuple equality.
#[derive(Debug, Clone, Copy, Eq)]
pub enum Move {
    ScheduleAdmission {
        day: u32,
        room: usize,
        patient: usize,
        ot: usize,
    },
    UnscheduleAdmission {
        day: u32,
        room: usize,
        patient: usize,
        ot: usize,
    },
    AssignNurse {
        shift: u32,
        room: usize,
        nurse: usize,
    },
    UnassignNurse {
        shift: u32,
        room: usize,
        nurse: usize,
    },
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        use Move::*;
        match (self, other) {
            (
                ScheduleAdmission { day: d1, room: r1, patient: p1, ot: o1 },
                ScheduleAdmission { day: d2, room: r2, patient: p2, ot: o2 },
            ) => d1 == d2 && r1 == r2 && p1 == p2 && o1 == o2,
            (
                UnscheduleAdmission { day: d1, room: r1, patient: p1, ot: o1 },
                UnscheduleAdmission { day: d2, room: r2, patient: p2, ot: o2 },
            ) => d1 == d2 && r1 == r2 && p1 == p2 && o1 == o2,
            (
                AssignNurse { room: r1, nurse: n1, .. },
                AssignNurse { room: r2, nurse: n2, .. },
            ) => r1 == r2 && n1 == n2,
            (
                UnassignNurse { room: r1, nurse: n1, .. },
                UnassignNurse { room: r2, nurse: n2, .. },
            ) => r1 == r2 && n1 == n2,
            _ => false,
        }
    }
}

impl Move {
    /// Human-readable action string for the CSV action log (`spec.md` §6).
    pub fn describe(&self) -> String {
        match self {
            Move::ScheduleAdmission { day, room, patient, ot } => {
                format!("schedule patient {patient} on day {day} in room {room}, ot {ot}")
            }
            Move::UnscheduleAdmission { day, room, patient, ot } => {
                format!("unschedule patient {patient} from day {day} room {room} ot {ot}")
            }
            Move::AssignNurse { shift, room, nurse } => {
                format!("assign nurse {nurse} to room {room} on shift {shift}")
            }
            Move::UnassignNurse { shift, room, nurse } => {
                format!("unassign nurse {nurse} from room {room} on shift {shift}")
            }
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_moves_compare_all_four_fields() {
        let a = Move::ScheduleAdmission { day: 0, room: 1, patient: 2, ot: 3 };
        let b = Move::ScheduleAdmission { day: 0, room: 1, patient: 2, ot: 4 };
        assert_ne!(a, b);
        assert_eq!(a, Move::ScheduleAdmission { day: 0, room: 1, patient: 2, ot: 3 });
    }

    #[test]
    fn nurse_moves_ignore_the_shift_dimension() {
        let a = Move::AssignNurse { shift: 0, room: 1, nurse: 2 };
        let b = Move::AssignNurse { shift: 5, room: 1, nurse: 2 };
        assert_eq!(a, b, "nurse-move tabu equality must ignore shift");
    }

    #[test]
    fn nurse_moves_still_distinguish_room_and_nurse() {
        let a = Move::AssignNurse { shift: 0, room: 1, nurse: 2 };
        assert_ne!(a, Move::AssignNurse { shift: 0, room: 2, nurse: 2 });
        assert_ne!(a, Move::AssignNurse { shift: 0, room: 1, nurse: 3 });
    }

    #[test]
    fn assign_and_unassign_never_compare_equal() {
        let a = Move::AssignNurse { shift: 0, room: 1, nurse: 2 };
        let b = Move::UnassignNurse { shift: 0, room: 1, nurse: 2 };
        assert_ne!(a, b);
    }

    #[test]
    fn describe_mentions_the_move_kind() {
        let m = Move::ScheduleAdmission { day: 0, room: 1, patient: 2, ot: 3 };
        assert!(m.describe().contains("schedule patient 2"));
    }
}
