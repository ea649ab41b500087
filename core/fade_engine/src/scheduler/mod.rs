use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::debug;
use rtrb::{Producer, PushError, RingBuffer};
use transport::clock::{FrameClock, WallClock};

use crate::{
    constants::SCHEDULER_COMMAND_CAPACITY,
    scheduler::{
        command::{SchedulerCommand, SchedulerCommandConsumer, SchedulerOverflow},
        task::{Task, TaskStatus},
    },
};

pub mod command;
pub mod task;

/// The scheduler's end of a [`SchedulerLink`].
struct LinkEnd {
    commands: SchedulerCommandConsumer,
    overflow: SchedulerOverflow,
}

impl LinkEnd {
    fn pop(&mut self) -> Option<SchedulerCommand> {
        self.commands
            .pop()
            .ok()
            .or_else(|| self.overflow.lock().take())
    }
}

/// Drives every active task once per update cycle.
///
/// Tasks arrive through [`SchedulerLink`]s, one lock-free ring per producer,
/// and are only ever touched from the thread calling [`Scheduler::update`].
pub struct Scheduler {
    /// currently running tasks
    tasks: Vec<Box<dyn Task>>,
    /// one command ring per link
    links: Vec<LinkEnd>,
    /// converts rendered frames into elapsed seconds
    clock: FrameClock,
    /// whether the update loop is active; shared with every link
    running: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            tasks: Vec::new(),
            links: Vec::new(),
            clock: FrameClock::new(sample_rate),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Opens a new command path into this scheduler.
    pub fn link(&mut self) -> SchedulerLink {
        let (producer, commands) = RingBuffer::new(SCHEDULER_COMMAND_CAPACITY);
        let overflow = SchedulerOverflow::default();
        self.links.push(LinkEnd {
            commands,
            overflow: Arc::clone(&overflow),
        });
        SchedulerLink {
            producer,
            overflow,
            running: Arc::clone(&self.running),
        }
    }

    pub fn process_command(&mut self, cmd: SchedulerCommand) {
        match cmd {
            SchedulerCommand::Spawn(task) => {
                debug!("scheduling task {}", task.id());
                self.tasks.push(task);
            }
        }
    }

    fn drain_commands(&mut self) {
        let mut links = std::mem::take(&mut self.links);
        for link in &mut links {
            while let Some(cmd) = link.pop() {
                self.process_command(cmd);
            }
        }
        // a dropped link has nothing more to say
        links.retain(|link| !link.commands.is_abandoned());
        self.links = links;
    }

    /// Runs one update cycle: applies pending commands, then ticks every
    /// task by `delta` seconds. Returns false when the loop is stopped, in
    /// which case no task is ticked.
    pub fn update(&mut self, delta: f64) -> bool {
        self.drain_commands();

        if !self.is_running() {
            return false;
        }

        self.tasks
            .retain_mut(|task| task.tick(delta) == TaskStatus::Running);
        true
    }

    /// Runs one update cycle sized by the number of frames just rendered.
    pub fn advance_frames(&mut self, frames: u64) -> bool {
        match self.clock.advance_by(frames) {
            Some(delta) => self.update(delta),
            None => {
                self.drain_commands();
                false
            }
        }
    }

    /// Runs one update cycle sized by the wall-clock time since the last
    /// one, for loops that no audio callback drives.
    pub fn update_from(&mut self, clock: &mut WallClock) -> bool {
        self.update(clock.delta())
    }

    pub fn start(&mut self) {
        self.clock.start();
        self.running.store(true, Ordering::Release);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.clock.elapsed_seconds()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.tasks)
            .field("links", &self.links.len())
            .field("clock", &self.clock)
            .field("running", &self.is_running())
            .finish()
    }
}

/// The sending half of a scheduler connection, owned by a single producer.
///
/// Sending never fails. Once the ring is full the newest command waits in a
/// single overflow slot, replacing any command already parked there, and is
/// applied on the next update.
pub struct SchedulerLink {
    producer: Producer<SchedulerCommand>,
    overflow: SchedulerOverflow,
    running: Arc<AtomicBool>,
}

impl SchedulerLink {
    /// Whether the scheduler on the other end is currently ticking.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn send(&mut self, cmd: SchedulerCommand) {
        let Err(PushError::Full(cmd)) = self.producer.push(cmd) else {
            return;
        };
        let replaced = self.overflow.lock().replace(cmd);
        if let Some(replaced) = replaced {
            debug!("scheduler command queue is full, dropping {replaced:?}");
        }
    }
}

impl fmt::Debug for SchedulerLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerLink")
            .field("slots", &self.producer.slots())
            .field("overflowing", &self.overflow.lock().is_some())
            .field("running", &self.is_running())
            .finish()
    }
}
