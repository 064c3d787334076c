//! The tabu-search controller (`spec.md` §4.9).

use std::collections::VecDeque;

use log::{debug, info};

use crate::instance::InstanceModel;
use crate::moves::{Move, MoveGenerator};
use crate::penalty::{PenaltyBreakdown, PenaltyEvaluator};
use crate::state::{EngineError, EngineState, SnapshotStore};

/// Outcome of a full search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub iterations: u32,
    pub final_penalty: u32,
    pub breakdown: PenaltyBreakdown,
}

/// Iterative best-improvement search with FIFO tabu memory and aspiration
/// (`spec.md` §4.9). Holds only the three run parameters; all mutable
/// search state (tabu memory, incumbent, snapshot) lives on the stack of
/// [`TabuDriver::run`].
#[derive(Debug, Clone, Copy)]
pub struct TabuDriver {
    tabu_size: usize,
    factor: f64,
    max_iter: u32,
}

impl TabuDriver {
    pub fn new(tabu_size: usize, factor: f64, max_iter: u32) -> Self {
        Self { tabu_size, factor, max_iter }
    }

    /// Runs the search to completion, mutating `engine` in place and
    /// invoking `on_commit(iteration, penalty, move)` once per committed
    /// move — the hook the CSV action log is wired through (`spec.md` §6).
    pub fn run(
        &self,
        model: &InstanceModel,
        engine: &mut EngineState,
        mut on_commit: impl FnMut(u32, u32, &Move),
    ) -> RunReport {
        let generator = MoveGenerator::new();
        let evaluator = PenaltyEvaluator::new();

        let mut tabu: VecDeque<Move> = VecDeque::with_capacity(self.tabu_size);
        let mut snapshot = SnapshotStore::new();
        let (mut incumbent, mut breakdown) = evaluator.evaluate(model, engine);
        let mut iterations = 0u32;

        info!("starting tabu search: incumbent={incumbent}, max_iter={}", self.max_iter);

        while iterations < self.max_iter {
            let candidates = generator.candidates(model, engine);
            let mut best: Option<(u32, Move)> = None;

            for candidate in candidates {
                let applied = Self::apply(engine, model, &candidate);
                let penalty = match applied {
                    Ok(()) => {
                        let (penalty, _) = evaluator.evaluate(model, engine);
                        Self::rollback(engine, model, &candidate);
                        penalty
                    }
                    Err(EngineError::Action(_)) => continue,
                    Err(EngineError::Invariant(e)) => {
                        panic!("invariant violated while probing a generated move: {e}")
                    }
                };

                let is_tabu = tabu.contains(&candidate);
                if is_tabu && !Self::aspiration_admits(penalty, incumbent, self.factor) {
                    continue;
                }

                let improves = match &best {
                    Some((b, _)) => penalty < *b,
                    None => true,
                };
                if improves {
                    best = Some((penalty, candidate));
                }
            }

            let Some((penalty, chosen)) = best else {
                debug!("iteration {iterations}: no admissible move, terminating");
                break;
            };

            Self::apply(engine, model, &chosen)
                .expect("a move admissible during probing must reapply cleanly when committed");

            tabu.push_back(chosen);
            if tabu.len() > self.tabu_size {
                tabu.pop_front();
            }

            if penalty < incumbent {
                incumbent = penalty;
                snapshot.save(&engine.pas, &engine.scp, &engine.nra);
                debug!("iteration {iterations}: new incumbent {incumbent} via {chosen}");
            }

            on_commit(iterations, penalty, &chosen);
            iterations += 1;
        }

        if snapshot.has_snapshot() {
            let (pas, scp, nra) = snapshot.restore().expect("has_snapshot just returned true");
            engine.pas = pas;
            engine.scp = scp;
            engine.nra = nra;
        }

        let (final_penalty, final_breakdown) = evaluator.evaluate(model, engine);
        breakdown = final_breakdown;
        info!("search finished after {iterations} iterations: penalty={final_penalty}");

        RunReport { iterations, final_penalty, breakdown }
    }

    /// Aspiration criterion (`spec.md` §4.9 step 3d): a tabu move is still
    /// admitted if its penalty beats `incumbent * factor`. Pulled out as a
    /// pure function so the aspiration math itself is directly testable
    /// (E6).
    fn aspiration_admits(penalty: u32, incumbent: u32, factor: f64) -> bool {
        (penalty as f64) < incumbent as f64 * factor
    }

    fn apply(engine: &mut EngineState, model: &InstanceModel, mv: &Move) -> Result<(), EngineError> {
        match *mv {
            Move::ScheduleAdmission { day, room, patient, ot } => {
                engine.schedule_admission(model, day, room, patient, ot)
            }
            Move::UnscheduleAdmission { patient, .. } => engine.unschedule_admission(model, patient),
            Move::AssignNurse { shift, room, nurse } => engine.assign_nurse(shift, room, nurse),
            Move::UnassignNurse { shift, room, nurse } => engine.unassign_nurse(shift, room, nurse),
        }
    }

    /// Inverts a move that was just successfully applied as a probe.
    /// Bypasses the forward-move hard-constraint guards where they would
    /// incorrectly reject a pure revert (`spec.md` §5, tentative-apply).
    fn rollback(engine: &mut EngineState, model: &InstanceModel, mv: &Move) {
        match *mv {
            Move::ScheduleAdmission { patient, .. } => {
                engine
                    .unschedule_admission(model, patient)
                    .expect("rollback of a successful schedule probe must succeed");
            }
            Move::UnscheduleAdmission { day, room, patient, ot } => {
                engine
                    .schedule_admission(model, day, room, patient, ot)
                    .expect("rollback of a successful unschedule probe must succeed");
            }
            Move::AssignNurse { shift, room, nurse } => {
                engine.force_unassign_nurse(shift, room, nurse);
            }
            Move::UnassignNurse { shift, room, nurse } => {
                engine
                    .assign_nurse(shift, room, nurse)
                    .expect("rollback of a successful unassign probe must succeed");
            }
        }
    }
}
