use rustc_hash::FxHashMap;

use super::state::{Location, ProcessId, SchedCtx};

#[derive(Debug)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SchedCtx) {
        self.step += 1;

        if let Some(running) = ctx.running {
            let process = ctx.process(running.id);
            debug_assert_eq!(
                process.location,
                Location::Running,
                "CPU occupant {} must be Running",
                process.label
            );
            debug_assert_eq!(
                running.level, ctx.current_level,
                "Occupant {} level disagrees with the engine's current level",
                process.label
            );
            debug_assert!(
                running.slice_used <= ctx.queues.config(running.level).time_slice,
                "Occupant {} overran its time slice",
                process.label
            );
        }

        let mut seen: FxHashMap<ProcessId, usize> = FxHashMap::default();
        for (index, level) in ctx.queues.levels().iter().enumerate() {
            for id in level.iter() {
                *seen.entry(id).or_default() += 1;
                let process = ctx.process(id);
                debug_assert_eq!(
                    process.location,
                    Location::Waiting(index),
                    "Process {} queued at level {index} but located elsewhere",
                    process.label
                );
            }
        }
        for (&id, &count) in &seen {
            debug_assert_eq!(
                count,
                1,
                "Process {} queued {count} times",
                ctx.process(id).label
            );
        }

        let pending = ctx
            .processes
            .values()
            .filter(|process| process.location == Location::Pending)
            .count();
        let running = usize::from(ctx.running.is_some());
        debug_assert_eq!(
            pending + seen.len() + running,
            ctx.outstanding(),
            "Every live process must be pending, waiting or running"
        );
        debug_assert_eq!(ctx.processes.len(), ctx.outstanding());
    }
}
