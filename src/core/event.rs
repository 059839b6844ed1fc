use crate::core::{LevelId, Ticks};
use crate::sim::Label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreemptReason {
    // A level-0 arrival while the occupant ran below the top level
    Arrival,
    // A strictly higher level became non-empty
    HigherLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedEvent {
    Arrived {
        label: Label,
    },
    Preempted {
        label: Label,
        level: LevelId,
        reason: PreemptReason,
    },
    Dispatched {
        label: Label,
        level: LevelId,
    },
    Ran {
        label: Label,
        level: LevelId,
    },
    Completed {
        label: Label,
        response_time: Ticks,
        turnaround_time: Ticks,
    },
    Demoted {
        label: Label,
        from: LevelId,
        to: LevelId,
    },
    SliceExpired {
        label: Label,
        level: LevelId,
    },
    // Periodic reset of every waiting (and running) process to level 0
    Boosted {
        moved: usize,
    },
    // Nothing runnable this tick
    Idle,
}
