pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::MlfqCore;
pub use event::{PreemptReason, SchedEvent};
pub use state::{
    Level, LevelConfig, LevelId, Location, Process, ProcessId, QueueStore, Running, SchedCtx,
    Ticks,
};
