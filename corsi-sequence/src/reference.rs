use std::collections::BTreeMap;

use corsi_core::Sequence;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-authored test material: sequences keyed by length, one entry per
/// trial index in insertion order. Serializable so hosts can load a
/// standardized library from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    by_length: BTreeMap<usize, Vec<Sequence>>,
}

/// What is wrong with one reference entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("reference for length {length}, trial {trial} has {actual} items")]
    WrongLength {
        length: usize,
        trial: usize,
        actual: usize,
    },
    #[error(
        "reference for length {length}, trial {trial} addresses block {index}, board has {num_positions}"
    )]
    IndexOutOfRange {
        length: usize,
        trial: usize,
        index: usize,
        num_positions: usize,
    },
    #[error("reference for length {length}, trial {trial} taps block {index} twice in a row")]
    AdjacentRepeat {
        length: usize,
        trial: usize,
        index: usize,
    },
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sequence to the trial list for its own length.
    pub fn push(&mut self, sequence: Sequence) {
        self.by_length
            .entry(sequence.len())
            .or_default()
            .push(sequence);
    }

    pub fn get(&self, length: usize, trial: usize) -> Option<&Sequence> {
        self.by_length.get(&length).and_then(|trials| trials.get(trial))
    }

    pub fn contains(&self, length: usize, trial: usize) -> bool {
        self.get(length, trial).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.by_length.is_empty()
    }

    /// Number of entries across all lengths.
    pub fn len(&self) -> usize {
        self.by_length.values().map(Vec::len).sum()
    }

    /// Check every entry against the board size and the repeat policy.
    ///
    /// Deserialized sets can carry entries whose length disagrees with their
    /// slot, so the slot/length match is checked here as well.
    pub fn validate(
        &self,
        num_positions: usize,
        avoid_repeats: bool,
    ) -> Result<(), ReferenceError> {
        for (&length, trials) in &self.by_length {
            for (trial, sequence) in trials.iter().enumerate() {
                if sequence.len() != length {
                    return Err(ReferenceError::WrongLength {
                        length,
                        trial,
                        actual: sequence.len(),
                    });
                }
                if let Some(&index) = sequence.iter().find(|&&index| index >= num_positions) {
                    return Err(ReferenceError::IndexOutOfRange {
                        length,
                        trial,
                        index,
                        num_positions,
                    });
                }
                if avoid_repeats {
                    if let Some(pair) = sequence
                        .indices()
                        .windows(2)
                        .find(|pair| pair[0] == pair[1])
                    {
                        return Err(ReferenceError::AdjacentRepeat {
                            length,
                            trial,
                            index: pair[0],
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl FromIterator<Sequence> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = Sequence>>(iter: I) -> Self {
        let mut set = Self::new();
        for sequence in iter {
            set.push(sequence);
        }
        set
    }
}
