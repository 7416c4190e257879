//! Cancellable delayed-task queue on a virtual millisecond clock.
//!
//! Each controller owns one. Tasks fall due in `(due, insertion)` order, and
//! [`Scheduler::reset`] drops everything pending while bumping the generation,
//! so work queued for an abandoned round can never reach the next one.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    generation: u64,
    queue: BinaryHeap<Reverse<(u64, u64)>>,
    tasks: HashMap<u64, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            now_ms: 0,
            next_seq: 0,
            generation: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.push(Reverse((due, seq)));
        self.tasks.insert(seq, task);
        TaskId(seq)
    }

    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        // The heap entry stays behind and is skipped when popped.
        self.tasks.remove(&id.0)
    }

    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.queue.clear();
        self.tasks.clear();
    }

    pub fn next_due(&mut self) -> Option<u64> {
        while let Some(&Reverse((due, seq))) = self.queue.peek() {
            if self.tasks.contains_key(&seq) {
                return Some(due);
            }
            self.queue.pop();
        }
        None
    }

    /// Pops the earliest task due at or before `until_ms` and moves the clock
    /// to its due time. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        while let Some(&Reverse((due, seq))) = self.queue.peek() {
            if due > until_ms {
                return None;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&seq) {
                self.now_ms = self.now_ms.max(due);
                return Some(task);
            }
        }
        None
    }

    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}
