use super::job::Label;
use crate::core::Ticks;

/// Outcome of one process, recorded the tick it terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: Label,
    pub arrival_time: Ticks,
    pub work: Ticks,
    pub response_time: Ticks,
    pub turnaround_time: Ticks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub makespan: Ticks,
    pub avg_response_time: Ticks,
    pub avg_turnaround_time: Ticks,
}

#[derive(Debug, Default)]
pub struct MetricsSink {
    total_response_time: Ticks,
    total_turnaround_time: Ticks,
    completions: Vec<Completion>,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, completion: Completion) {
        self.total_response_time += completion.response_time;
        self.total_turnaround_time += completion.turnaround_time;
        self.completions.push(completion);
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    // Averages truncate toward zero
    pub fn finalize(&self, makespan: Ticks) -> Summary {
        let count = self.completions.len() as Ticks;
        let avg = |total: Ticks| total.checked_div(count).unwrap_or(0);
        Summary {
            makespan,
            avg_response_time: avg(self.total_response_time),
            avg_turnaround_time: avg(self.total_turnaround_time),
        }
    }
}
