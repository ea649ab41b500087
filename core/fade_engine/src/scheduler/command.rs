use std::sync::Arc;

use parking_lot::Mutex;
use rtrb::Consumer;

use crate::scheduler::task::Task;

#[derive(Debug)]
pub enum SchedulerCommand {
    /// Start ticking a task on the next update
    Spawn(Box<dyn Task>),
}

pub type SchedulerCommandConsumer = Consumer<SchedulerCommand>;

/// Holds the newest command a link could not fit into its ring.
pub type SchedulerOverflow = Arc<Mutex<Option<SchedulerCommand>>>;
