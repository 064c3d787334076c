//! Surgical Case Planning: the `[day, patient, surgeon, OT]` tensor
//! (`spec.md` §3, §4.3).

/// Dense `[day, patient, surgeon, OT]` tensor of surgery minutes, flat
/// row-major (`spec.md` §9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SCPState {
    days: u32,
    patient_count: usize,
    surgeon_count: usize,
    ot_count: usize,
    cells: Vec<u32>,
}

impl SCPState {
    pub fn new(days: u32, patient_count: usize, surgeon_count: usize, ot_count: usize) -> Self {
        Self {
            days,
            patient_count,
            surgeon_count,
            ot_count,
            cells: vec![0; days as usize * patient_count * surgeon_count * ot_count],
        }
    }

    fn index(&self, day: u32, patient: usize, surgeon: usize, ot: usize) -> usize {
        ((day as usize * self.patient_count + patient) * self.surgeon_count + surgeon)
            * self.ot_count
            + ot
    }

    pub fn get(&self, day: u32, patient: usize, surgeon: usize, ot: usize) -> u32 {
        self.cells[self.index(day, patient, surgeon, ot)]
    }

    /// Places `duration` minutes of surgery for `patient`.
    pub fn schedule_surgery(
        &mut self,
        day: u32,
        patient: usize,
        surgeon: usize,
        ot: usize,
        duration: u32,
    ) {
        let i = self.index(day, patient, surgeon, ot);
        self.cells[i] = duration;
    }

    /// Clears every cell for `patient`, on whichever day it was scheduled.
    pub fn unschedule(&mut self, patient: usize) {
        for d in 0..self.days {
            for s in 0..self.surgeon_count {
                for o in 0..self.ot_count {
                    let i = self.index(d, patient, s, o);
                    self.cells[i] = 0;
                }
            }
        }
    }

    /// The single non-zero `(day, surgeon, ot, duration)` cell for
    /// `patient`, if scheduled (I2: at most one by construction).
    pub fn lookup(&self, patient: usize) -> Option<(u32, usize, usize, u32)> {
        for d in 0..self.days {
            for s in 0..self.surgeon_count {
                for o in 0..self.ot_count {
                    let duration = self.get(d, patient, s, o);
                    if duration > 0 {
                        return Some((d, s, o, duration));
                    }
                }
            }
        }
        None
    }

    /// Minutes already committed to `surgeon` on `day`, across all patients
    /// and OTs.
    pub fn surgeon_minutes(&self, day: u32, surgeon: usize) -> u32 {
        (0..self.patient_count)
            .flat_map(|p| (0..self.ot_count).map(move |o| (p, o)))
            .map(|(p, o)| self.get(day, p, surgeon, o))
            .sum()
    }

    /// Minutes already committed in `ot` on `day`, across all patients and
    /// surgeons.
    pub fn ot_minutes(&self, day: u32, ot: usize) -> u32 {
        (0..self.patient_count)
            .flat_map(|p| (0..self.surgeon_count).map(move |s| (p, s)))
            .map(|(p, s)| self.get(day, p, s, ot))
            .sum()
    }

    /// H3: adding `extra` minutes would not exceed `max_minutes`.
    pub fn surgeon_overtime_ok(&self, day: u32, surgeon: usize, extra: u32, max_minutes: u32) -> bool {
        self.surgeon_minutes(day, surgeon) + extra <= max_minutes
    }

    /// H4: adding `extra` minutes would not exceed `availability`.
    pub fn ot_overtime_ok(&self, day: u32, ot: usize, extra: u32, availability: u32) -> bool {
        self.ot_minutes(day, ot) + extra <= availability
    }

    /// Distinct non-dummy OTs each surgeon appears in on `day` (S6 input).
    pub fn surgeon_ots_on_day(&self, day: u32, surgeon: usize, dummy_ot: usize) -> Vec<usize> {
        let mut ots: Vec<usize> = (0..self.ot_count)
            .filter(|&o| o != dummy_ot && self.ot_minutes_for_surgeon(day, surgeon, o) > 0)
            .collect();
        ots.sort_unstable();
        ots
    }

    fn ot_minutes_for_surgeon(&self, day: u32, surgeon: usize, ot: usize) -> u32 {
        (0..self.patient_count)
            .map(|p| self.get(day, p, surgeon, ot))
            .sum()
    }
}
