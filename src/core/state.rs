use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

use crate::sim::Label;

pub type Ticks = u64;
// Index into the level Vec, 0 is the highest priority
pub type LevelId = usize;
new_key_type! {
    pub struct ProcessId;
}

/// Where a live process currently is. Terminated processes are removed from
/// the process table instead of getting a variant of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Pending,
    Waiting(LevelId),
    Running,
}

#[derive(Debug)]
pub struct Process {
    pub id: ProcessId,
    pub label: Label,
    pub arrival_time: Ticks,
    pub required_work: Ticks,
    pub work_remaining: Ticks,
    pub time_in_queue: Ticks,
    pub total_time_used: Ticks,
    pub response_time: Option<Ticks>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub time_slice: Ticks,
    pub time_allotment: Ticks,
}

#[derive(Debug)]
pub struct Level {
    pub config: LevelConfig,
    waiting: VecDeque<ProcessId>,
}

impl Level {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            config,
            waiting: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.waiting.iter().copied()
    }
}

/// N FIFO levels, each tagged with its slice and allotment.
#[derive(Debug)]
pub struct QueueStore {
    levels: Vec<Level>,
}

impl QueueStore {
    pub fn new(configs: &[LevelConfig]) -> Self {
        assert!(!configs.is_empty(), "Queue store requires at least one level");
        Self {
            levels: configs.iter().copied().map(Level::new).collect(),
        }
    }

    pub fn enqueue(&mut self, level: LevelId, id: ProcessId) {
        self.levels[level].waiting.push_back(id);
    }

    pub fn dequeue_front(&mut self, level: LevelId) -> Option<ProcessId> {
        self.levels[level].waiting.pop_front()
    }

    pub fn highest_non_empty_level(&self) -> Option<LevelId> {
        self.levels.iter().position(|level| !level.is_empty())
    }

    pub fn config(&self, level: LevelId) -> LevelConfig {
        self.levels[level].config
    }

    pub fn lowest_level(&self) -> LevelId {
        self.levels.len() - 1
    }

    pub fn level(&self, level: LevelId) -> &Level {
        &self.levels[level]
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn waiting_count(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    // Drain every level below the top, in ascending level order
    pub fn drain_lower_levels(&mut self) -> Vec<ProcessId> {
        self.levels[1..]
            .iter_mut()
            .flat_map(|level| level.waiting.drain(..))
            .collect()
    }
}

/// The occupant of the CPU, plus the level it was dispatched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Running {
    pub id: ProcessId,
    pub level: LevelId,
    pub slice_used: Ticks,
}

#[derive(Debug)]
pub struct SchedCtx {
    pub now: Ticks,
    pub boost_period: Ticks,
    pub processes: SlotMap<ProcessId, Process>,
    pub queues: QueueStore,
    pub running: Option<Running>,
    // Level the next dispatch cycle is accounted against; reset to 0 by boost
    pub current_level: LevelId,

    // Created but not yet terminated
    outstanding: usize,
}

impl SchedCtx {
    pub fn new(levels: &[LevelConfig], boost_period: Ticks) -> Self {
        assert!(boost_period > 0, "Boost period must be positive");
        Self {
            now: 0,
            boost_period,
            processes: SlotMap::with_key(),
            queues: QueueStore::new(levels),
            running: None,
            current_level: 0,
            outstanding: 0,
        }
    }

    pub fn create_process(&mut self, label: Label, arrival_time: Ticks, work: Ticks) -> ProcessId {
        assert!(work > 0, "Process {label} must require at least one tick");
        self.outstanding += 1;
        self.processes.insert_with_key(|id| Process {
            id,
            label,
            arrival_time,
            required_work: work,
            work_remaining: work,
            time_in_queue: 0,
            total_time_used: 0,
            response_time: None,
            location: Location::Pending,
        })
    }

    pub fn process(&self, id: ProcessId) -> &Process {
        self.processes
            .get(id)
            .expect("Process id refers to a destroyed process")
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut Process {
        self.processes
            .get_mut(id)
            .expect("Process id refers to a destroyed process")
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn push_waiting(&mut self, level: LevelId, id: ProcessId) {
        debug_assert!(
            self.running.is_none_or(|running| running.id != id),
            "Process must leave the CPU before it is enqueued"
        );
        self.process_mut(id).location = Location::Waiting(level);
        self.queues.enqueue(level, id);
    }

    pub fn pop_waiting(&mut self, level: LevelId) -> Option<ProcessId> {
        let id = self.queues.dequeue_front(level)?;
        debug_assert_eq!(
            self.process(id).location,
            Location::Waiting(level),
            "Queue membership and location disagree"
        );
        Some(id)
    }

    pub fn set_running(&mut self, id: ProcessId, level: LevelId) {
        debug_assert!(self.running.is_none(), "CPU already running a process");
        self.process_mut(id).location = Location::Running;
        self.running = Some(Running {
            id,
            level,
            slice_used: 0,
        });
        self.current_level = level;
    }

    // Idle the CPU, returning whoever was on it
    pub fn clear_running(&mut self) -> Option<Running> {
        self.running.take()
    }

    pub fn destroy(&mut self, id: ProcessId) -> Process {
        let process = self
            .processes
            .remove(id)
            .expect("Destroying a process twice");
        debug_assert_eq!(process.work_remaining, 0, "Destroying unfinished process");
        self.outstanding -= 1;
        process
    }

    pub fn all_terminated(&self) -> bool {
        self.outstanding == 0
    }
}
