use corsi_core::Sequence;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reference::ReferenceSet;

/// How per-trial sequences are sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    /// Draw a fresh random sequence for every trial.
    Random,
    /// Serve pre-authored reference sequences for reproducible test
    /// material. `allow_random_fallback` controls whether a slot with no
    /// entry may be filled by a random draw; when it is `false`, full
    /// coverage is a validation requirement and generation never misses.
    Fixed { allow_random_fallback: bool },
}

/// Where a served sequence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceOrigin {
    /// Pre-authored reference material.
    Reference,
    /// Random draw in random mode.
    Random,
    /// Random draw standing in for a missing reference entry.
    Fallback,
}

/// Produces one sequence per requested (length, trial) slot.
///
/// Callers are expected to have validated the board and length range up
/// front (`num_positions >= 2`, requested lengths in `2..=num_positions`'s
/// testable range); generation itself never fails.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    num_positions: usize,
    mode: GenerationMode,
    avoid_repeats: bool,
    reference: ReferenceSet,
}

impl SequenceGenerator {
    pub fn new(
        num_positions: usize,
        mode: GenerationMode,
        avoid_repeats: bool,
        reference: ReferenceSet,
    ) -> Self {
        Self {
            num_positions,
            mode,
            avoid_repeats,
            reference,
        }
    }

    /// Produce the sequence for one trial slot, together with its origin.
    ///
    /// In fixed mode a missing reference entry falls back to a random draw;
    /// the returned [`SequenceOrigin::Fallback`] and a warning event make
    /// the substitution visible instead of silently changing the material.
    pub fn generate<R: Rng>(
        &self,
        length: usize,
        trial: usize,
        rng: &mut R,
    ) -> (Sequence, SequenceOrigin) {
        match self.mode {
            GenerationMode::Fixed { .. } => {
                if let Some(sequence) = self.reference.get(length, trial) {
                    (sequence.clone(), SequenceOrigin::Reference)
                } else {
                    warn!(length, trial, "no reference entry for this slot, drawing a random sequence");
                    (self.draw(length, rng), SequenceOrigin::Fallback)
                }
            }
            GenerationMode::Random => (self.draw(length, rng), SequenceOrigin::Random),
        }
    }

    /// Uniform draws from the board. With repeat avoidance each index after
    /// the first is resampled until it differs from its predecessor; only
    /// one value is ever excluded, so the expected cost stays O(1) per draw.
    fn draw<R: Rng>(&self, length: usize, rng: &mut R) -> Sequence {
        debug_assert!(self.num_positions >= 2);
        let mut indices: Vec<usize> = Vec::with_capacity(length);
        for _ in 0..length {
            let index = loop {
                let candidate = rng.random_range(0..self.num_positions);
                if !(self.avoid_repeats && indices.last() == Some(&candidate)) {
                    break candidate;
                }
            };
            indices.push(index);
        }
        Sequence::new(indices)
    }
}
