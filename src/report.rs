use std::io::{self, Write};

use crate::{core::SchedEvent, sim::Summary};

/// Line-oriented trace: one `<level> <label>` per executed tick, one
/// `<label> <response> <turnaround>` per completion and a final
/// `<makespan> <avgResponse> <avgTurnaround>`. Levels are printed 1-based.
pub struct TraceWriter<W: Write> {
    out: W,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn event(&mut self, event: &SchedEvent) -> io::Result<()> {
        match event {
            SchedEvent::Ran { label, level } => writeln!(self.out, "{} {}", level + 1, label),
            SchedEvent::Completed {
                label,
                response_time,
                turnaround_time,
            } => writeln!(self.out, "{label} {response_time} {turnaround_time}"),
            _ => Ok(()),
        }
    }

    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {} {}",
            summary.makespan, summary.avg_response_time, summary.avg_turnaround_time
        )
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::PreemptReason, sim::Label};
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_only_contract_lines() {
        let mut writer = TraceWriter::new(Vec::new());
        let a = Label::from_index(0);
        let events = [
            SchedEvent::Arrived { label: a.clone() },
            SchedEvent::Dispatched {
                label: a.clone(),
                level: 1,
            },
            SchedEvent::Ran {
                label: a.clone(),
                level: 1,
            },
            SchedEvent::Preempted {
                label: a.clone(),
                level: 1,
                reason: PreemptReason::Arrival,
            },
            SchedEvent::Idle,
            SchedEvent::Completed {
                label: a,
                response_time: 3,
                turnaround_time: 12,
            },
        ];
        for event in &events {
            writer.event(event).unwrap();
        }
        writer
            .summary(&Summary {
                makespan: 12,
                avg_response_time: 3,
                avg_turnaround_time: 12,
            })
            .unwrap();

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "2 A\nA 3 12\n12 3 12\n");
    }
}
