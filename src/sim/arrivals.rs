use std::collections::VecDeque;

use super::job::Job;
use crate::core::Ticks;

/// Jobs not yet introduced to the queue store, ordered by arrival time with
/// input order breaking ties.
#[derive(Debug)]
pub struct ArrivalScheduler {
    pending: VecDeque<Job>,
}

impl ArrivalScheduler {
    pub fn new(mut jobs: Vec<Job>) -> Self {
        // Stable sort keeps input order among equal arrival times
        jobs.sort_by_key(|job| job.arrival_time);
        Self {
            pending: jobs.into(),
        }
    }

    /// Remove and yield every job arriving exactly at `now`. This will be
    /// contiguous at the front, since jobs are sorted.
    pub fn admit(&mut self, now: Ticks) -> impl Iterator<Item = Job> + '_ {
        std::iter::from_fn(move || {
            if self.pending.front()?.arrival_time == now {
                self.pending.pop_front()
            } else {
                None
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
