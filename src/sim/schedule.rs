//! Deferred callbacks on the game clock
//!
//! Sub-frame events (pattern volleys, turret spawns, the fire debounce, the
//! player's shot timer) are queued here instead of on a global timer facility.
//! Every handle is retained by its owner in a [`TaskSet`] so the owner can
//! cancel everything it scheduled in one call.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::Millis;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Ordered queue of deferred tasks
///
/// Tasks run in due-time order; tasks due at the same time run in the order
/// they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BTreeMap<(Millis, u64), T>,
    due_by_id: HashMap<u64, Millis>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` to run `delay` ms after `now`
    pub fn schedule(&mut self, now: Millis, delay: Millis, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = now.saturating_add(delay);
        self.queue.insert((due, seq), task);
        self.due_by_id.insert(seq, due);
        TimerId(seq)
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id.0) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    /// Whether the task is still waiting to run
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id.0)
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, Millis, T)> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        self.due_by_id.remove(&seq);
        Some((TimerId(seq), due, task))
    }

    /// Pending tasks in due order
    pub fn tasks(&self) -> impl Iterator<Item = &T> + '_ {
        self.queue.values()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Cancellation scope for the tasks one owner has scheduled
///
/// With a capacity set, tracking a new handle past the limit forgets the
/// oldest one. Forgetting does not cancel: the task still runs, it just can no
/// longer be cancelled through this set.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    handles: VecDeque<TimerId>,
    capacity: Option<usize>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Change the bound, evicting the oldest handles if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = Some(capacity);
        self.evict();
    }

    /// Remember a handle so `cancel_all` reaches it
    pub fn track(&mut self, id: TimerId) {
        self.handles.push_back(id);
        self.evict();
    }

    /// Stop tracking a handle (after it ran)
    pub fn forget(&mut self, id: TimerId) {
        self.handles.retain(|&h| h != id);
    }

    fn evict(&mut self) {
        if let Some(cap) = self.capacity {
            while self.handles.len() > cap {
                self.handles.pop_front();
            }
        }
    }

    /// Cancel every tracked task. Returns how many were still pending.
    pub fn cancel_all<T>(&mut self, scheduler: &mut Scheduler<T>) -> usize {
        self.handles
            .drain(..)
            .filter(|&id| scheduler.cancel(id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.handles.iter().copied()
    }
}
