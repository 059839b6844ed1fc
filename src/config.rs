use clap::Parser;
use thiserror::Error;

use crate::{
    core::{LevelConfig, Ticks},
    sim::{Job, Label},
};

pub const USAGE: &str = "mlfq <T> <numberOfQueues> [<timeSlice> <timeAllotment>]... [<arrivalTime> <workRemaining>]...";

#[derive(Parser, Debug)]
#[command(
    name = "mlfq",
    about = "Replay a multilevel feedback queue scheduler one tick at a time",
    override_usage = USAGE
)]
pub struct Cli {
    /// Priority boost period in ticks
    #[arg(value_name = "T", allow_negative_numbers = true)]
    pub boost_period: i64,

    /// Number of priority levels
    #[arg(value_name = "numberOfQueues", allow_negative_numbers = true)]
    pub num_queues: i64,

    /// Time slice and allotment per level, then arrival time and work per process
    #[arg(value_name = "VALUES", allow_negative_numbers = true, num_args = 0..)]
    pub values: Vec<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time period must be positive, got {0}")]
    NonPositivePeriod(i64),
    #[error("number of queues must be positive, got {0}")]
    NonPositiveQueues(i64),
    #[error("expected {expected} values for {queues} queues, got {got}")]
    MissingQueueValues {
        queues: usize,
        expected: usize,
        got: usize,
    },
    #[error("process values must come in <arrivalTime> <workRemaining> pairs, got {0} values")]
    UnpairedProcessValues(usize),
    #[error("at least one process is required")]
    NoProcesses,
    #[error("queue {level} time slice must be positive, got {value}")]
    NonPositiveSlice { level: usize, value: i64 },
    #[error("queue {level} time allotment must be positive, got {value}")]
    NonPositiveAllotment { level: usize, value: i64 },
    #[error("process {label} arrival time must not be negative, got {value}")]
    NegativeArrival { label: String, value: i64 },
    #[error("process {label} work must be positive, got {value}")]
    NonPositiveWork { label: String, value: i64 },
}

/// A fully validated simulation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub boost_period: Ticks,
    pub levels: Vec<LevelConfig>,
    pub jobs: Vec<Job>,
}

impl SimConfig {
    pub fn from_values(
        boost_period: i64,
        num_queues: i64,
        values: &[i64],
    ) -> Result<Self, ConfigError> {
        if boost_period <= 0 {
            return Err(ConfigError::NonPositivePeriod(boost_period));
        }
        if num_queues <= 0 {
            return Err(ConfigError::NonPositiveQueues(num_queues));
        }

        let queues = usize::try_from(num_queues)
            .map_err(|_| ConfigError::NonPositiveQueues(num_queues))?;
        let expected = queues
            .checked_mul(2)
            .filter(|&expected| expected <= values.len())
            .ok_or(ConfigError::MissingQueueValues {
                queues,
                expected: queues.saturating_mul(2),
                got: values.len(),
            })?;
        let (queue_values, process_values) = values.split_at(expected);

        if process_values.len() % 2 != 0 {
            return Err(ConfigError::UnpairedProcessValues(process_values.len()));
        }
        if process_values.is_empty() {
            return Err(ConfigError::NoProcesses);
        }

        let levels = queue_values
            .chunks_exact(2)
            .enumerate()
            .map(|(index, pair)| {
                let level = index + 1;
                let time_slice = positive(pair[0])
                    .ok_or(ConfigError::NonPositiveSlice { level, value: pair[0] })?;
                let time_allotment = positive(pair[1])
                    .ok_or(ConfigError::NonPositiveAllotment { level, value: pair[1] })?;
                Ok(LevelConfig {
                    time_slice,
                    time_allotment,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let jobs = process_values
            .chunks_exact(2)
            .enumerate()
            .map(|(id, pair)| {
                let label = || Label::from_index(id).to_string();
                let arrival_time =
                    Ticks::try_from(pair[0]).map_err(|_| ConfigError::NegativeArrival {
                        label: label(),
                        value: pair[0],
                    })?;
                let work = positive(pair[1]).ok_or_else(|| ConfigError::NonPositiveWork {
                    label: label(),
                    value: pair[1],
                })?;
                Ok(Job {
                    id,
                    arrival_time,
                    work,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            boost_period: boost_period as Ticks,
            levels,
            jobs,
        })
    }
}

impl TryFrom<&Cli> for SimConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        Self::from_values(cli.boost_period, cli.num_queues, &cli.values)
    }
}

fn positive(value: i64) -> Option<Ticks> {
    Ticks::try_from(value).ok().filter(|&value| value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_levels_then_processes() {
        let config = SimConfig::from_values(100, 2, &[1, 1, 4, 3, 0, 3, 1, 1]).unwrap();
        assert_eq!(config.boost_period, 100);
        assert_eq!(
            config.levels,
            vec![
                LevelConfig {
                    time_slice: 1,
                    time_allotment: 1,
                },
                LevelConfig {
                    time_slice: 4,
                    time_allotment: 3,
                },
            ]
        );
        assert_eq!(
            config.jobs,
            vec![
                Job {
                    id: 0,
                    arrival_time: 0,
                    work: 3,
                },
                Job {
                    id: 1,
                    arrival_time: 1,
                    work: 1,
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_period_and_queue_count() {
        assert_eq!(
            SimConfig::from_values(0, 1, &[1, 1, 0, 1]),
            Err(ConfigError::NonPositivePeriod(0))
        );
        assert_eq!(
            SimConfig::from_values(5, -1, &[1, 1, 0, 1]),
            Err(ConfigError::NonPositiveQueues(-1))
        );
    }

    #[test]
    fn rejects_short_or_unpaired_input() {
        assert_eq!(
            SimConfig::from_values(5, 2, &[1, 1, 2]),
            Err(ConfigError::MissingQueueValues {
                queues: 2,
                expected: 4,
                got: 3,
            })
        );
        assert_eq!(
            SimConfig::from_values(5, 1, &[1, 1, 0]),
            Err(ConfigError::UnpairedProcessValues(1))
        );
        assert_eq!(
            SimConfig::from_values(5, 1, &[1, 1]),
            Err(ConfigError::NoProcesses)
        );
    }

    #[test]
    fn rejects_non_positive_level_and_process_values() {
        assert_eq!(
            SimConfig::from_values(5, 2, &[1, 1, 0, 1, 0, 1]),
            Err(ConfigError::NonPositiveSlice { level: 2, value: 0 })
        );
        assert_eq!(
            SimConfig::from_values(5, 1, &[1, -2, 0, 1]),
            Err(ConfigError::NonPositiveAllotment { level: 1, value: -2 })
        );
        assert_eq!(
            SimConfig::from_values(5, 1, &[1, 1, 0, 1, -1, 1]),
            Err(ConfigError::NegativeArrival {
                label: "B".to_string(),
                value: -1,
            })
        );
        assert_eq!(
            SimConfig::from_values(5, 1, &[1, 1, 0, 0]),
            Err(ConfigError::NonPositiveWork {
                label: "A".to_string(),
                value: 0,
            })
        );
    }

    #[test]
    fn cli_accepts_negative_numbers_for_validation() {
        let cli = Cli::try_parse_from(["mlfq", "-3", "1", "1", "1", "0", "1"]).unwrap();
        assert_eq!(
            SimConfig::try_from(&cli),
            Err(ConfigError::NonPositivePeriod(-3))
        );
    }

    #[test]
    fn cli_rejects_non_integers() {
        assert!(Cli::try_parse_from(["mlfq", "10", "one"]).is_err());
        assert!(Cli::try_parse_from(["mlfq", "10"]).is_err());
    }
}
