use rustc_hash::FxHashMap;
use tracing::info;

use super::{
    arrivals::ArrivalScheduler,
    job::{Job, JobId},
    metrics::{Completion, MetricsSink, Summary},
};
use crate::{
    config::SimConfig,
    core::{LevelConfig, MlfqCore, ProcessId, SchedEvent, Ticks},
};

pub struct Sim {
    pub core: MlfqCore,
    arrivals: ArrivalScheduler,
    metrics: MetricsSink,
    // JobId --> ProcessId map; used to hand arriving jobs to the engine
    jobs_to_processes: FxHashMap<JobId, ProcessId>,
}

impl Sim {
    pub fn new(levels: &[LevelConfig], boost_period: Ticks, jobs: Vec<Job>) -> Self {
        let mut core = MlfqCore::new(levels, boost_period);
        let jobs_to_processes = jobs
            .iter()
            .map(|job| {
                let id = core
                    .ctx
                    .create_process(job.label(), job.arrival_time, job.work);
                (job.id, id)
            })
            .collect();

        info!(
            levels = levels.len(),
            boost_period,
            processes = jobs.len(),
            "starting simulation"
        );

        Self {
            core,
            arrivals: ArrivalScheduler::new(jobs),
            metrics: MetricsSink::new(),
            jobs_to_processes,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(&config.levels, config.boost_period, config.jobs.clone())
    }

    /// Run one unit of simulated time and return what happened during it.
    pub fn step(&mut self) -> Vec<SchedEvent> {
        let mut events = Vec::new();
        let now = self.core.now();

        for job in self.arrivals.admit(now) {
            let id = *self
                .jobs_to_processes
                .get(&job.id)
                .expect("Arriving job missing associated process");
            self.core.admit(id, &mut events);
        }

        if let Some(completion) = self.core.tick(&mut events) {
            self.metrics.record(completion);
        }

        events
    }

    /// Step until every process has terminated, handing each event to
    /// `on_event` in order.
    pub fn run(&mut self, mut on_event: impl FnMut(&SchedEvent)) -> Summary {
        while !self.all_jobs_completed() {
            for event in self.step() {
                on_event(&event);
            }
        }

        let summary = self.summary();
        info!(
            makespan = summary.makespan,
            avg_response_time = summary.avg_response_time,
            avg_turnaround_time = summary.avg_turnaround_time,
            "simulation finished"
        );
        summary
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.all_terminated()
    }

    pub fn completions(&self) -> &[Completion] {
        self.metrics.completions()
    }

    pub fn summary(&self) -> Summary {
        self.metrics.finalize(self.core.now())
    }
}
