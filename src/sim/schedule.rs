//! Cancellable deferred tasks
//!
//! Round transitions and transient effects run after fixed delays. Each task
//! carries the `RoundKey` it was scheduled for so a restart (or any round
//! change) can drop tasks that belong to a round that no longer exists.
//! Time is virtual milliseconds advanced by the caller.

use serde::{Deserialize, Serialize};

/// Identifies one round of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundKey {
    /// Bumped on every start/restart
    pub session: u32,
    pub round: u32,
}

impl RoundKey {
    pub fn new(session: u32, round: u32) -> Self {
        Self { session, round }
    }
}

/// Handle for cancelling a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task waiting for its due time
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<T> {
    pub id: TaskId,
    pub due_ms: u64,
    pub key: RoundKey,
    pub task: T,
}

/// Virtual-clock task queue
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run `task` `delay_ms` from now
    pub fn schedule(&mut self, key: RoundKey, delay_ms: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms + delay_ms,
            key,
            task,
        });
        id
    }

    /// Cancel one task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every task belonging to sessions other than `session`
    pub fn cancel_other_sessions(&mut self, session: u32) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.key.session == session);
        before - self.pending.len()
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to
    /// its due time. Ties run in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Scheduled<T>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;
        let task = self.pending.remove(index);
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Move the clock forward (never backward)
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}
