//! Patient Admission Scheduling: the `[day, room, patient]` bitmap
//! (`spec.md` §3, §4.2).

/// Dense `[day, room, patient]` occupancy bitmap, stored as a flat
/// row-major buffer (`spec.md` §9, "big dense bitmap layout").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PASState {
    days: u32,
    room_count: usize,
    patient_count: usize,
    cells: Vec<bool>,
}

impl PASState {
    pub fn new(days: u32, room_count: usize, patient_count: usize) -> Self {
        Self {
            days,
            room_count,
            patient_count,
            cells: vec![false; days as usize * room_count * patient_count],
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn room_count(&self) -> usize {
        self.room_count
    }

    pub fn patient_count(&self) -> usize {
        self.patient_count
    }

    fn index(&self, day: u32, room: usize, patient: usize) -> usize {
        (day as usize * self.room_count + room) * self.patient_count + patient
    }

    pub fn get(&self, day: u32, room: usize, patient: usize) -> bool {
        self.cells[self.index(day, room, patient)]
    }

    /// Writes 1s over `[day, min(D, day + length))` for `patient` in `room`.
    pub fn schedule_interval(&mut self, day: u32, room: usize, patient: usize, length: u32) {
        let end = self.days.min(day + length);
        for d in day..end {
            let i = self.index(d, room, patient);
            self.cells[i] = true;
        }
    }

    /// Clears every cell for `patient`, wherever it was scheduled.
    pub fn unschedule_patient(&mut self, patient: usize) {
        for d in 0..self.days {
            for r in 0..self.room_count {
                let i = self.index(d, r, patient);
                self.cells[i] = false;
            }
        }
    }

    pub fn is_scheduled(&self, patient: usize) -> bool {
        (0..self.days).any(|d| (0..self.room_count).any(|r| self.get(d, r, patient)))
    }

    /// The admission day and room, if `patient` currently occupies any cell.
    pub fn lookup_schedule(&self, patient: usize) -> Option<(u32, usize)> {
        for d in 0..self.days {
            for r in 0..self.room_count {
                if self.get(d, r, patient) {
                    return Some((d, r));
                }
            }
        }
        None
    }

    /// Patient indices occupying `(day, room)`.
    pub fn residents_at(&self, day: u32, room: usize) -> Vec<usize> {
        (0..self.patient_count)
            .filter(|&p| self.get(day, room, p))
            .collect()
    }

    /// H6: admission window, `releaseDay <= day`, and `<= dueDay` if given.
    pub fn admission_window_ok(day: u32, release_day: u32, due_day: Option<u32>) -> bool {
        let within_due = match due_day {
            Some(due) => day <= due,
            None => true,
        };
        day >= release_day && within_due
    }

    /// H2: `room` is not in `incompatible_rooms`.
    pub fn room_compatible(room: usize, incompatible_rooms: &[usize]) -> bool {
        !incompatible_rooms.contains(&room)
    }

    /// H7: occupancy of `(day, room)` does not exceed `capacity`.
    pub fn capacity_ok(&self, day: u32, room: usize, capacity: u32) -> bool {
        self.residents_at(day, room).len() as u32 <= capacity
    }

    /// `true` if no patient occupies `(day, room)`.
    pub fn room_empty(&self, day: u32, room: usize) -> bool {
        self.residents_at(day, room).is_empty()
    }
}
