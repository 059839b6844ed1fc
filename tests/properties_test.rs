/*!
 * Scheduling Property Tests
 * Conservation and accounting checks over generated workloads
 */

use std::collections::HashMap;

use mlfq_model::{
    Job, Label, Sim,
    core::{LevelConfig, SchedEvent, Ticks},
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Debug, Default)]
struct RunRecord {
    // Ticks at which each label executed
    ran_at: HashMap<Label, Vec<Ticks>>,
    ran_per_tick: Vec<usize>,
    makespan: Ticks,
}

fn record(sim: &mut Sim) -> RunRecord {
    let mut record = RunRecord::default();
    while !sim.all_jobs_completed() {
        let now = sim.core.now();
        let events = sim.step();
        let mut ran = 0;
        for event in events {
            if let SchedEvent::Ran { label, .. } = event {
                record.ran_at.entry(label).or_default().push(now);
                ran += 1;
            }
        }
        record.ran_per_tick.push(ran);
    }
    record.makespan = sim.summary().makespan;
    record
}

fn check_run(levels: &[LevelConfig], period: Ticks, jobs: Vec<Job>) -> Result<(), TestCaseError> {
    let mut sim = Sim::new(levels, period, jobs.clone());
    let record = record(&mut sim);

    prop_assert!(record.ran_per_tick.iter().all(|&ran| ran <= 1));
    prop_assert_eq!(sim.completions().len(), jobs.len());

    let mut last_tick = 0;
    for job in &jobs {
        let label = job.label();
        let completion = sim
            .completions()
            .iter()
            .find(|completion| completion.label == label);
        prop_assert!(completion.is_some(), "{} never completed", label);
        let completion = completion.unwrap();
        let ran_at = &record.ran_at[&label];

        prop_assert_eq!(ran_at.len() as Ticks, job.work);
        prop_assert_eq!(completion.response_time, ran_at[0] - job.arrival_time);
        let last = *ran_at.last().unwrap();
        prop_assert_eq!(completion.turnaround_time, last + 1 - job.arrival_time);
        prop_assert!(completion.turnaround_time >= completion.response_time + job.work);
        last_tick = last_tick.max(last);
    }

    prop_assert_eq!(record.makespan, last_tick + 1);
    Ok(())
}

fn levels_strategy() -> impl Strategy<Value = Vec<LevelConfig>> {
    prop::collection::vec((1..5u64, 1..10u64), 1..5).prop_map(|levels| {
        levels
            .into_iter()
            .map(|(time_slice, time_allotment)| LevelConfig {
                time_slice,
                time_allotment,
            })
            .collect()
    })
}

fn jobs_strategy() -> impl Strategy<Value = Vec<Job>> {
    prop::collection::vec((0..20u64, 1..10u64), 1..10).prop_map(|jobs| {
        jobs.into_iter()
            .enumerate()
            .map(|(id, (arrival_time, work))| Job {
                id,
                arrival_time,
                work,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_every_process_completes_with_consistent_accounting(
        levels in levels_strategy(),
        period in 1..30u64,
        jobs in jobs_strategy(),
    ) {
        check_run(&levels, period, jobs)?;
    }

    #[test]
    fn prop_single_level_never_leaves_the_top(
        slice in 1..5u64,
        allotment in 1..5u64,
        period in 1..30u64,
        jobs in jobs_strategy(),
    ) {
        let levels = [LevelConfig { time_slice: slice, time_allotment: allotment }];
        let mut sim = Sim::new(&levels, period, jobs);
        while !sim.all_jobs_completed() {
            for event in sim.step() {
                let demoted = matches!(event, SchedEvent::Demoted { .. });
                prop_assert!(!demoted);
                if let SchedEvent::Ran { level, .. } = event {
                    prop_assert_eq!(level, 0);
                }
            }
        }
    }

    #[test]
    fn prop_boost_without_lower_levels_moves_nothing(
        period in 1..10u64,
        jobs in jobs_strategy(),
    ) {
        let levels = [LevelConfig { time_slice: 2, time_allotment: 3 }];
        let mut sim = Sim::new(&levels, period, jobs);
        while !sim.all_jobs_completed() {
            for event in sim.step() {
                if let SchedEvent::Boosted { moved } = event {
                    prop_assert_eq!(moved, 0);
                }
            }
        }
    }
}

fn bernoulli_jobs(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_ticks: u64,
    long_ticks: u64,
    seed: u64,
) -> Vec<Job> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jobs = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let work = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            jobs.push(Job {
                id: jobs.len(),
                arrival_time: t,
                work,
            });
        }
    }

    jobs
}

#[test]
fn test_bernoulli_workload_stress() {
    let levels = [
        LevelConfig {
            time_slice: 1,
            time_allotment: 2,
        },
        LevelConfig {
            time_slice: 2,
            time_allotment: 6,
        },
        LevelConfig {
            time_slice: 4,
            time_allotment: 16,
        },
    ];

    for seed in 0..4 {
        let jobs = bernoulli_jobs(300, 0.3, 0.3, 2, 6, seed);
        assert!(!jobs.is_empty());
        check_run(&levels, 25, jobs).unwrap();
    }
}
