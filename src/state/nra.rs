//! Nurse-to-Room Assignment: the `[shift, room, nurse]` bitmap, plus the
//! derived `workloadReq` / `skillReq` views (`spec.md` §3, §4.4).

/// One resident's per-shift contribution to a room's demand, already
/// aligned so offset `0` is the first shift of the day being recomputed
/// (`spec.md` §4.4: `workloadProduced[0 .. (endDay-day)*S)`).
#[derive(Debug, Clone, Copy)]
pub struct ResidentDemand {
    pub workload: u32,
    pub skill_required: u32,
}

/// Dense `[shift, room, nurse]` coverage bitmap with the two demand views
/// maintained alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NRAState {
    shift_count: u32,
    room_count: usize,
    nurse_count: usize,
    assignments: Vec<bool>,
    workload_req: Vec<u32>,
    skill_req: Vec<u32>,
}

impl NRAState {
    pub fn new(shift_count: u32, room_count: usize, nurse_count: usize) -> Self {
        Self {
            shift_count,
            room_count,
            nurse_count,
            assignments: vec![false; shift_count as usize * room_count * nurse_count],
            workload_req: vec![0; shift_count as usize * room_count],
            skill_req: vec![0; shift_count as usize * room_count],
        }
    }

    fn index(&self, shift: u32, room: usize, nurse: usize) -> usize {
        (shift as usize * self.room_count + room) * self.nurse_count + nurse
    }

    fn demand_index(&self, shift: u32, room: usize) -> usize {
        shift as usize * self.room_count + room
    }

    pub fn is_assigned(&self, shift: u32, room: usize, nurse: usize) -> bool {
        self.assignments[self.index(shift, room, nurse)]
    }

    pub fn assign_nurse(&mut self, shift: u32, room: usize, nurse: usize) {
        let i = self.index(shift, room, nurse);
        self.assignments[i] = true;
    }

    pub fn unassign_nurse(&mut self, shift: u32, room: usize, nurse: usize) {
        let i = self.index(shift, room, nurse);
        self.assignments[i] = false;
    }

    /// The nurse covering `(shift, room)`, if any (I11: at most one).
    pub fn assigned_nurse(&self, shift: u32, room: usize) -> Option<usize> {
        (0..self.nurse_count).find(|&n| self.is_assigned(shift, room, n))
    }

    /// Every `(shift, room)` pair currently assigned to `nurse`.
    pub fn nurse_assignments(&self, nurse: usize) -> Vec<(u32, usize)> {
        let mut out = Vec::new();
        for s in 0..self.shift_count {
            for r in 0..self.room_count {
                if self.is_assigned(s, r, nurse) {
                    out.push((s, r));
                }
            }
        }
        out
    }

    pub fn workload_req(&self, shift: u32, room: usize) -> u32 {
        self.workload_req[self.demand_index(shift, room)]
    }

    pub fn skill_req(&self, shift: u32, room: usize) -> u32 {
        self.skill_req[self.demand_index(shift, room)]
    }

    /// Recomputes `workloadReq`/`skillReq` for the `shifts_per_day` shifts of
    /// `day` in `room` from the current resident set, summing workload and
    /// taking the max skill requirement (`spec.md` §3).
    pub fn recompute_demand(
        &mut self,
        day: u32,
        shifts_per_day: u32,
        room: usize,
        residents: &[Vec<ResidentDemand>],
    ) {
        for offset in 0..shifts_per_day {
            let shift = day * shifts_per_day + offset;
            let workload: u32 = residents
                .iter()
                .filter_map(|r| r.get(offset as usize))
                .map(|d| d.workload)
                .sum();
            let skill: u32 = residents
                .iter()
                .filter_map(|r| r.get(offset as usize))
                .map(|d| d.skill_required)
                .max()
                .unwrap_or(0);
            let i = self.demand_index(shift, room);
            self.workload_req[i] = workload;
            self.skill_req[i] = skill;
        }
    }

    /// H8: every shift of `[day, endDay)` in `room` has an assigned nurse.
    pub fn coverage_ok(&self, day: u32, end_day: u32, shifts_per_day: u32, room: usize) -> bool {
        (day * shifts_per_day..end_day * shifts_per_day)
            .all(|s| self.assigned_nurse(s, room).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_unassign_flip_the_bit() {
        let mut nra = NRAState::new(3, 2, 2);
        assert!(!nra.is_assigned(0, 0, 0));
        nra.assign_nurse(0, 0, 0);
        assert!(nra.is_assigned(0, 0, 0));
        nra.unassign_nurse(0, 0, 0);
        assert!(!nra.is_assigned(0, 0, 0));
    }

    #[test]
    fn assigned_nurse_finds_the_sole_occupant() {
        let mut nra = NRAState::new(1, 1, 3);
        nra.assign_nurse(0, 0, 2);
        assert_eq!(nra.assigned_nurse(0, 0), Some(2));
    }

    #[test]
    fn coverage_ok_requires_every_shift_in_range() {
        let mut nra = NRAState::new(6, 1, 1);
        nra.assign_nurse(0, 0, 0);
        nra.assign_nurse(1, 0, 0);
        assert!(!nra.coverage_ok(0, 1, 3, 0)); // shift 2 uncovered
        nra.assign_nurse(2, 0, 0);
        assert!(nra.coverage_ok(0, 1, 3, 0));
    }

    #[test]
    fn recompute_demand_sums_workload_and_maxes_skill() {
        let mut nra = NRAState::new(3, 1, 1);
        let residents = vec![
            vec![ResidentDemand { workload: 2, skill_required: 1 }],
            vec![ResidentDemand { workload: 5, skill_required: 3 }],
        ];
        nra.recompute_demand(0, 1, 0, &residents);
        assert_eq!(nra.workload_req(0, 0), 7);
        assert_eq!(nra.skill_req(0, 0), 3);
    }

    #[test]
    fn nurse_assignments_lists_every_pair() {
        let mut nra = NRAState::new(2, 2, 1);
        nra.assign_nurse(0, 0, 0);
        nra.assign_nurse(1, 1, 0);
        let mut got = nra.nurse_assignments(0);
        got.sort();
        assert_eq!(got, vec![(0, 0), (1, 1)]);
    }
}
