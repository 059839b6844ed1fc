use tracing::{debug, trace};

use super::{
    event::{PreemptReason, SchedEvent},
    observer::Observer,
    state::{LevelConfig, LevelId, ProcessId, SchedCtx, Ticks},
};
use crate::sim::Completion;

pub struct MlfqCore {
    pub ctx: SchedCtx,
    observer: Observer,
}

impl MlfqCore {
    pub fn new(levels: &[LevelConfig], boost_period: Ticks) -> Self {
        Self {
            ctx: SchedCtx::new(levels, boost_period),
            observer: Observer::new(),
        }
    }

    /// Place a newly arrived process at the tail of level 0. An occupant
    /// running below the top level yields to it immediately; one already
    /// running at level 0 keeps the CPU.
    pub fn admit(&mut self, id: ProcessId, events: &mut Vec<SchedEvent>) {
        self.ctx.push_waiting(0, id);
        events.push(SchedEvent::Arrived {
            label: self.ctx.process(id).label.clone(),
        });

        if let Some(running) = self.ctx.running.filter(|running| running.level > 0) {
            self.ctx.clear_running();
            self.ctx.push_waiting(running.level, running.id);
            let label = self.ctx.process(running.id).label.clone();
            debug!(now = self.ctx.now, %label, level = running.level, "preempted by arrival");
            events.push(SchedEvent::Preempted {
                label,
                level: running.level,
                reason: PreemptReason::Arrival,
            });
        }
    }

    // Return the completion record if the occupant finished during this tick
    pub fn tick(&mut self, events: &mut Vec<SchedEvent>) -> Option<Completion> {
        let highest = self.ctx.queues.highest_non_empty_level();

        // Nothing to run: the tick passes as a gap and boost is not evaluated
        if self.ctx.running.is_none() && highest.is_none() {
            trace!(now = self.ctx.now, "idle");
            events.push(SchedEvent::Idle);
            self.ctx.advance_time(1);
            self.observer.observe(&self.ctx);
            return None;
        }

        self.dispatch(highest, events);
        let completion = self.execute(events);

        self.ctx.advance_time(1);
        if self.ctx.now % self.ctx.boost_period == 0 {
            self.boost(events);
        }

        self.observer.observe(&self.ctx);
        completion
    }

    fn dispatch(&mut self, highest: Option<LevelId>, events: &mut Vec<SchedEvent>) {
        let level = match self.ctx.running {
            None => highest.expect("Dispatch requires a non-empty level"),
            Some(running) => match highest.filter(|&level| level < running.level) {
                Some(level) => {
                    self.ctx.clear_running();
                    self.ctx.push_waiting(running.level, running.id);
                    let label = self.ctx.process(running.id).label.clone();
                    debug!(now = self.ctx.now, %label, level = running.level, "preempted by higher level");
                    events.push(SchedEvent::Preempted {
                        label,
                        level: running.level,
                        reason: PreemptReason::HigherLevel,
                    });
                    level
                }
                None => return,
            },
        };

        let id = self
            .ctx
            .pop_waiting(level)
            .expect("Highest non-empty level has no head");
        self.ctx.set_running(id, level);

        let label = self.ctx.process(id).label.clone();
        debug!(now = self.ctx.now, %label, level, "dispatched");
        events.push(SchedEvent::Dispatched { label, level });
    }

    fn execute(&mut self, events: &mut Vec<SchedEvent>) -> Option<Completion> {
        let now = self.ctx.now;
        let running = self
            .ctx
            .running
            .as_mut()
            .expect("Executing a tick with an idle CPU");
        running.slice_used += 1;
        let running = *running;
        let config = self.ctx.queues.config(running.level);
        let lowest = self.ctx.queues.lowest_level();

        // In its own block to release the process borrow before requeueing
        let (label, work_remaining, time_in_queue) = {
            let process = self.ctx.process_mut(running.id);
            if process.response_time.is_none() {
                process.response_time = Some(now - process.arrival_time);
            }
            process.work_remaining -= 1;
            process.total_time_used += 1;
            process.time_in_queue += 1;
            (
                process.label.clone(),
                process.work_remaining,
                process.time_in_queue,
            )
        };

        trace!(now, %label, level = running.level, "ran");
        events.push(SchedEvent::Ran {
            label: label.clone(),
            level: running.level,
        });

        if work_remaining == 0 {
            self.ctx.clear_running();
            let process = self.ctx.destroy(running.id);
            let response_time = process
                .response_time
                .expect("Completed process never recorded a response time");
            let turnaround_time = now + 1 - process.arrival_time;

            debug!(now, %label, response_time, turnaround_time, "completed");
            events.push(SchedEvent::Completed {
                label: label.clone(),
                response_time,
                turnaround_time,
            });
            return Some(Completion {
                label,
                arrival_time: process.arrival_time,
                work: process.required_work,
                response_time,
                turnaround_time,
            });
        }

        if time_in_queue >= config.time_allotment && running.level < lowest {
            let to = running.level + 1;
            self.ctx.process_mut(running.id).time_in_queue = 0;
            self.ctx.clear_running();
            self.ctx.push_waiting(to, running.id);
            debug!(now, %label, from = running.level, to, "demoted");
            events.push(SchedEvent::Demoted {
                label,
                from: running.level,
                to,
            });
        } else if running.slice_used >= config.time_slice {
            self.ctx.clear_running();
            self.ctx.push_waiting(running.level, running.id);
            trace!(now, %label, level = running.level, "slice expired");
            events.push(SchedEvent::SliceExpired {
                label,
                level: running.level,
            });
        }

        None
    }

    fn boost(&mut self, events: &mut Vec<SchedEvent>) {
        let mut moved = self.ctx.queues.drain_lower_levels();
        if let Some(running) = self.ctx.running.filter(|running| running.level != 0) {
            self.ctx.clear_running();
            moved.push(running.id);
        }

        for &id in &moved {
            self.ctx.process_mut(id).time_in_queue = 0;
            self.ctx.push_waiting(0, id);
        }
        self.ctx.current_level = 0;

        debug!(now = self.ctx.now, moved = moved.len(), "priority boost");
        events.push(SchedEvent::Boosted { moved: moved.len() });
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn all_terminated(&self) -> bool {
        self.ctx.all_terminated()
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
