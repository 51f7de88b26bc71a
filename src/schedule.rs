//! Delayed tasks tagged with the recognition session that scheduled them.

use std::time::Instant;

/// Monotonic id handed to each recognition cycle.
pub type SessionId = u64;

#[derive(Clone, Debug)]
struct Pending<T> {
    due: Instant,
    session: SessionId,
    task: T,
}

/// Tasks come out in due order; cancelling a session drops everything it owns.
#[derive(Clone, Debug)]
pub struct TaskSchedule<T> {
    pending: Vec<Pending<T>>,
}

impl<T> TaskSchedule<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, session: SessionId, due: Instant, task: T) {
        let index = self.pending.partition_point(|pending| pending.due <= due);
        self.pending.insert(index, Pending { due, session, task });
    }

    /// Remove and return every task due at or before `now`, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(SessionId, T)> {
        let split = self.pending.partition_point(|pending| pending.due <= now);
        self.pending
            .drain(..split)
            .map(|pending| (pending.session, pending.task))
            .collect()
    }

    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.session != session);
        before - self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TaskSchedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn yields_due_tasks_in_order() {
        let start = Instant::now();
        let mut schedule = TaskSchedule::new();
        schedule.schedule(1, start + Duration::from_millis(1500), "settle");
        schedule.schedule(1, start + Duration::from_millis(1000), "finish");
        schedule.schedule(1, start + Duration::from_millis(3000), "later");

        assert!(schedule.take_due(start).is_empty());
        let due = schedule.take_due(start + Duration::from_millis(2000));
        assert_eq!(due, vec![(1, "finish"), (1, "settle")]);
        assert!(!schedule.is_empty());
        assert_eq!(schedule.take_due(start + Duration::from_millis(3000)), vec![(1, "later")]);
    }

    #[test]
    fn cancel_session_only_drops_that_session() {
        let start = Instant::now();
        let mut schedule = TaskSchedule::new();
        schedule.schedule(1, start, "stale");
        schedule.schedule(2, start, "live");
        assert_eq!(schedule.cancel_session(1), 1);
        assert_eq!(schedule.take_due(start), vec![(2, "live")]);
        assert!(schedule.is_empty());
    }
}
