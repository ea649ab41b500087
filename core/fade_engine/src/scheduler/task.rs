use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Finished,
    Cancelled,
}

/// Work driven once per update cycle by the [`Scheduler`](super::Scheduler).
pub trait Task: Send + fmt::Debug {
    fn id(&self) -> TaskId;

    /// Advances the task by `delta` seconds. Anything but
    /// [`TaskStatus::Running`] removes the task from the scheduler.
    fn tick(&mut self, delta: f64) -> TaskStatus;
}
