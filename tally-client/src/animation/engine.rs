// Tally STORY-002: Scheduler trait and manual scheduler
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Deferred work handed to a scheduler
pub type ScheduledTask = Box<dyn FnOnce()>;

/// "Run this after duration D" capability.
///
/// Implementations must never run a task before `schedule` returns; callers
/// schedule while holding mutable borrows of themselves.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask);

    /// Run on the next scheduler turn
    fn schedule_next_tick(&self, task: ScheduledTask) {
        self.schedule(Duration::ZERO, task)
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: ScheduledTask,
}

/// Single-threaded scheduler driven by an explicit virtual clock.
///
/// Tasks run in due order (ties in scheduling order) when the clock is
/// advanced. A running task may schedule more work; anything that falls due
/// before the advance ends runs in the same call.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Due time of the earliest waiting task
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.borrow().iter().map(|pending| pending.due).min()
    }

    /// Run everything already due without moving the clock
    pub fn run_due(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Move the clock forward by `by`, running tasks as they fall due.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now.get().saturating_add(by);
        let mut ran = 0;
        while let Some(pending) = self.pop_due(deadline) {
            if pending.due > self.now.get() {
                self.now.set(pending.due);
            }
            (pending.task)();
            ran += 1;
        }
        self.now.set(deadline);
        ran
    }

    /// Keep advancing until no task is waiting. Returns the number of tasks
    /// run. Does not return if tasks keep rescheduling themselves forever.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(due) = self.next_due() {
            ran += self.advance(due.saturating_sub(self.now.get()));
        }
        ran
    }

    fn pop_due(&self, deadline: Duration) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= deadline)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;
        Some(queue.swap_remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(Pending {
            due: self.now.get().saturating_add(delay),
            seq,
            task,
        });
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}
