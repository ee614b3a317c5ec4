use serde::{Deserialize, Serialize};

use crate::sequence::Sequence;

/// A participant's reproduction attempt as reported by the host runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Block indices in the order they were tapped.
    pub taps: Vec<usize>,
    /// Per-tap times in milliseconds, measured by the host from the start of
    /// the response window. Carried verbatim; may be empty if the host does
    /// not time taps.
    pub tap_times_ms: Vec<u64>,
}

impl Response {
    pub fn new(taps: Vec<usize>, tap_times_ms: Vec<u64>) -> Self {
        Self { taps, tap_times_ms }
    }

    pub fn from_taps(taps: Vec<usize>) -> Self {
        Self {
            taps,
            tap_times_ms: Vec::new(),
        }
    }

    /// The shape recorded when the participant gave no answer at all
    /// (e.g. a finite response deadline expired untouched).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Scored outcome of one presented sequence. Built by [`RoundResult::score`]
/// when a trial finishes and owned by the staircase afterwards, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub sequence: Sequence,
    pub response: Response,
    pub correct: bool,
}

impl RoundResult {
    /// Score a response against the sequence it answered.
    ///
    /// All-or-nothing: `correct` requires the same number of taps and the
    /// same block at every place. Anything else the host can plausibly hand
    /// over — empty, truncated, overlong, right blocks in the wrong order,
    /// indices that address no block — scores `false`.
    pub fn score(sequence: Sequence, response: Response) -> Self {
        let correct = response.taps.len() == sequence.len()
            && response.taps.iter().zip(sequence.iter()).all(|(t, s)| t == s);
        Self {
            sequence,
            response,
            correct,
        }
    }
}
