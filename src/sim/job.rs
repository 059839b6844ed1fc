use std::fmt;

use crate::core::Ticks;

/// Name of a process, assigned from its position in the input.
///
/// Indices map to bijective base-26 names: `A`..`Z`, then `AA`, `AB`, ..,
/// `ZZ`, `AAA`, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn from_index(index: usize) -> Self {
        let mut letters = Vec::new();
        let mut n = index + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        Self(letters.into_iter().map(char::from).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Position in the input; also the tie-break between equal arrival times
pub type JobId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub work: Ticks,
}

impl Job {
    pub fn label(&self) -> Label {
        Label::from_index(self.id)
    }
}
