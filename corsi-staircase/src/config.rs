use corsi_core::{Position, standard_nine};
use corsi_sequence::{GenerationMode, ReferenceError, ReferenceSet};
use corsi_timing::{IsiMode, TimingPolicy};
use thiserror::Error;

/// When the staircase gives up on longer sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Halt once every trial at a single length was answered incorrectly.
    BothTrials,
    /// Halt once `threshold` trials in a row were answered incorrectly,
    /// counted across length boundaries.
    ConsecutiveErrors { threshold: usize },
}

/// Everything a session needs, fixed before the first round and never
/// mutated afterwards. Start from `Default` and override fields with
/// struct-update syntax; `Session::new` validates the result before any
/// trial material exists.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The board. Must hold at least `max_length` blocks.
    pub positions: Vec<Position>,
    pub starting_length: usize,
    pub trials_per_length: usize,
    pub max_length: usize,
    pub stop_rule: StopRule,
    pub generation: GenerationMode,
    /// Pre-authored material for fixed mode; ignored in random mode.
    pub reference: ReferenceSet,
    pub avoid_repeats: bool,
    pub timing: TimingPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            positions: standard_nine(),
            starting_length: 2,
            trials_per_length: 2,
            max_length: 9,
            stop_rule: StopRule::BothTrials,
            generation: GenerationMode::Random,
            reference: ReferenceSet::new(),
            avoid_repeats: true,
            timing: TimingPolicy::default(),
        }
    }
}

/// A configuration the engine refuses to run. Everything here is caught
/// before the first sequence is generated, never mid-session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least one trial per length is required")]
    NoTrials,
    #[error("starting length {0} is shorter than the two-item minimum")]
    StartingLengthTooShort(usize),
    #[error("starting length {starting} exceeds maximum length {max}")]
    LengthRangeInverted { starting: usize, max: usize },
    #[error("{have} positions cannot serve sequences up to length {need}")]
    TooFewPositions { have: usize, need: usize },
    #[error("position {index} has a non-finite coordinate")]
    NonFinitePosition { index: usize },
    #[error("consecutive-errors threshold must be at least one")]
    ZeroErrorThreshold,
    #[error("distance-scaled isi needs a finite, non-negative ms-per-unit, got {0}")]
    InvalidIsiScale(f32),
    #[error("no reference sequence for length {length}, trial {trial}, and random fallback is disabled")]
    MissingReference { length: usize, trial: usize },
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl SessionConfig {
    /// Check ranges, the board, the timing parameters and the reference
    /// material. Fixed mode with fallback disabled additionally requires a
    /// reference entry for every (length, trial) slot the staircase can
    /// reach.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials_per_length < 1 {
            return Err(ConfigError::NoTrials);
        }
        if self.starting_length < 2 {
            return Err(ConfigError::StartingLengthTooShort(self.starting_length));
        }
        if self.starting_length > self.max_length {
            return Err(ConfigError::LengthRangeInverted {
                starting: self.starting_length,
                max: self.max_length,
            });
        }
        if self.positions.len() < self.max_length {
            return Err(ConfigError::TooFewPositions {
                have: self.positions.len(),
                need: self.max_length,
            });
        }
        if let Some(index) = self
            .positions
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(ConfigError::NonFinitePosition { index });
        }
        if matches!(self.stop_rule, StopRule::ConsecutiveErrors { threshold: 0 }) {
            return Err(ConfigError::ZeroErrorThreshold);
        }
        if let IsiMode::DistanceScaled { ms_per_unit, .. } = self.timing.isi {
            if !ms_per_unit.is_finite() || ms_per_unit < 0.0 {
                return Err(ConfigError::InvalidIsiScale(ms_per_unit));
            }
        }
        self.reference
            .validate(self.positions.len(), self.avoid_repeats)?;
        if matches!(
            self.generation,
            GenerationMode::Fixed {
                allow_random_fallback: false
            }
        ) {
            for length in self.starting_length..=self.max_length {
                for trial in 0..self.trials_per_length {
                    if !self.reference.contains(length, trial) {
                        return Err(ConfigError::MissingReference { length, trial });
                    }
                }
            }
        }
        Ok(())
    }
}
