//! Phase worklist with a LIFO prepend buffer.

use std::collections::VecDeque;

use crate::error::{BattleError, ErrorSeverity};
use crate::state::CombatantId;

use super::Phase;

/// Misuse of the scheduler. Always a broken invariant, never user input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("phase {running} is still running")]
    PhaseStillRunning { running: &'static str },

    #[error("no phase is running")]
    NoRunningPhase,

    #[error("combatant {0} has no open command slot this turn")]
    NoCommandSlot(CombatantId),

    #[error("combatant {0} has not committed a command")]
    CommandNotCommitted(CombatantId),
}

impl BattleError for SchedulerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::PhaseStillRunning { .. } => "PHASE_STILL_RUNNING",
            Self::NoRunningPhase => "NO_RUNNING_PHASE",
            Self::NoCommandSlot(_) => "NO_COMMAND_SLOT",
            Self::CommandNotCommitted(_) => "COMMAND_NOT_COMMITTED",
        }
    }
}

/// Ordered worklist of pending phases.
///
/// - [`append`](Self::append) adds to the back of the pending list.
/// - [`insert_next`](Self::insert_next) stages a phase in the prepend buffer.
///   When the running phase ends, the buffer is spliced to the front of the
///   pending list in reverse insertion order, so the most recent insert runs
///   first.
/// - [`pop_for_run`](Self::pop_for_run) flushes the buffer and pops the head.
///
/// At most one phase runs at a time; [`end_current`](Self::end_current)
/// marks it finished.
#[derive(Debug, Default)]
pub struct PhaseQueue {
    pending: VecDeque<Phase>,
    prepend: Vec<Phase>,
    running: Option<&'static str>,
    completed: u64,
}

impl PhaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a phase to the back; it runs after everything already pending.
    pub fn append(&mut self, phase: Phase) {
        self.pending.push_back(phase);
    }

    /// Schedules a phase to run as soon as the current one ends, ahead of
    /// everything pending and of earlier `insert_next` calls.
    pub fn insert_next(&mut self, phase: Phase) {
        self.prepend.push(phase);
    }

    /// Pops the next phase and marks it running.
    ///
    /// Returns `Ok(None)` when no work is left, which ends the drive loop.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::PhaseStillRunning`] if the previous phase
    /// has not ended.
    pub fn pop_for_run(&mut self) -> Result<Option<Phase>, SchedulerError> {
        if let Some(running) = self.running {
            return Err(SchedulerError::PhaseStillRunning { running });
        }

        self.flush_prepend();

        let phase = self.pending.pop_front();
        self.running = phase.as_ref().map(Phase::name);
        Ok(phase)
    }

    /// Marks the running phase as finished and returns its name.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoRunningPhase`] if nothing is running.
    pub fn end_current(&mut self) -> Result<&'static str, SchedulerError> {
        let name = self.running.take().ok_or(SchedulerError::NoRunningPhase)?;
        self.completed += 1;
        Ok(name)
    }

    /// Name of the running phase.
    pub fn current(&self) -> Option<&'static str> {
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Number of phases that have run to completion.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Drops every pending and staged phase, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len() + self.prepend.len();
        self.pending.clear();
        self.prepend.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.prepend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.prepend.is_empty()
    }

    /// Upcoming phases in the order they will run.
    pub fn upcoming(&self) -> impl Iterator<Item = &Phase> + '_ {
        self.prepend.iter().rev().chain(self.pending.iter())
    }

    fn flush_prepend(&mut self) {
        for phase in self.prepend.drain(..) {
            self.pending.push_front(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::SweepStep;
    use crate::state::CombatantId;

    fn flee(slot: u8) -> Phase {
        Phase::FleeAttempt {
            combatant: CombatantId(slot),
        }
    }

    fn run_next(queue: &mut PhaseQueue) -> Phase {
        let phase = queue.pop_for_run().unwrap().unwrap();
        queue.end_current().unwrap();
        phase
    }

    #[test]
    fn append_is_fifo() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::TurnInit);
        queue.append(Phase::TurnStart);
        queue.append(Phase::TurnEnd);

        assert_eq!(run_next(&mut queue), Phase::TurnInit);
        assert_eq!(run_next(&mut queue), Phase::TurnStart);
        assert_eq!(run_next(&mut queue), Phase::TurnEnd);
        assert_eq!(queue.pop_for_run().unwrap(), None);
    }

    #[test]
    fn insert_next_runs_most_recent_first() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::TurnStart);
        queue.append(Phase::TurnEnd);

        // While TurnStart runs, two phases are inserted.
        let running = queue.pop_for_run().unwrap().unwrap();
        assert_eq!(running, Phase::TurnStart);
        queue.insert_next(flee(2));
        queue.insert_next(flee(3));
        queue.end_current().unwrap();

        assert_eq!(run_next(&mut queue), flee(3));
        assert_eq!(run_next(&mut queue), flee(2));
        assert_eq!(run_next(&mut queue), Phase::TurnEnd);
    }

    #[test]
    fn prepend_runs_ahead_of_continuation_appended_by_running_phase() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::TurnStart);

        queue.pop_for_run().unwrap();
        queue.append(Phase::TurnEnd);
        queue.insert_next(flee(0));
        queue.insert_next(flee(1));
        queue.end_current().unwrap();

        let order: Vec<_> = (0..3).map(|_| run_next(&mut queue)).collect();
        assert_eq!(order, vec![flee(1), flee(0), Phase::TurnEnd]);
    }

    #[test]
    fn upcoming_reports_run_order_without_consuming() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::Sweep(SweepStep::FieldHealing));
        queue.insert_next(flee(0));
        queue.insert_next(flee(1));

        let upcoming: Vec<_> = queue.upcoming().cloned().collect();
        assert_eq!(
            upcoming,
            vec![flee(1), flee(0), Phase::Sweep(SweepStep::FieldHealing)]
        );
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn popping_while_running_is_fatal() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::TurnInit);
        queue.append(Phase::TurnStart);

        queue.pop_for_run().unwrap();
        let err = queue.pop_for_run().unwrap_err();

        assert_eq!(
            err,
            SchedulerError::PhaseStillRunning {
                running: "TurnInit"
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn ending_without_running_phase_is_fatal() {
        let mut queue = PhaseQueue::new();
        assert_eq!(queue.end_current(), Err(SchedulerError::NoRunningPhase));
    }

    #[test]
    fn empty_pop_is_not_an_error() {
        let mut queue = PhaseQueue::new();
        assert_eq!(queue.pop_for_run(), Ok(None));
        assert!(!queue.is_running());
    }

    #[test]
    fn clear_drops_pending_and_staged() {
        let mut queue = PhaseQueue::new();
        queue.append(Phase::TurnEnd);
        queue.insert_next(flee(0));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }
}
