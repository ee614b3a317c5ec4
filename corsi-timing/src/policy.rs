use corsi_core::{Position, Sequence};

/// Inter-stimulus interval mode: how the gap between two consecutive items
/// is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsiMode {
    /// Constant gap between consecutive items.
    Fixed { gap_ms: u64 },
    /// Gap grows with the spatial jump between consecutive items:
    /// `base_ms + distance * ms_per_unit`, rounded to the nearest
    /// millisecond. Larger jumps get proportionally more time (saccade and
    /// motor-planning cost); needs the position set at planning time.
    DistanceScaled { base_ms: u64, ms_per_unit: f32 },
}

/// Response cutoff, handed to the runner unchanged. The engine never
/// enforces it; a deadline that expires simply comes back as an empty
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDeadline {
    Unlimited,
    Within { ms: u64 },
}

/// Display timing for one sequence item: how long the block stays lit and
/// the gap that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingStep {
    pub show_ms: u64,
    pub gap_ms: u64,
}

/// Per-trial schedule for the runner: one step per item, where the last
/// step's gap is the post-sequence delay rather than an inter-item gap,
/// plus the pass-through response deadline and inter-trial pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingPlan {
    pub steps: Vec<TimingStep>,
    pub response_deadline: ResponseDeadline,
    pub inter_trial_ms: u64,
}

impl TimingPlan {
    /// Total presentation time: every lit interval plus every gap,
    /// including the trailing post-sequence delay.
    pub fn presentation_ms(&self) -> u64 {
        self.steps.iter().map(|step| step.show_ms + step.gap_ms).sum()
    }
}

/// Derives per-item display timing for sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPolicy {
    pub stimulus_ms: u64,
    pub isi: IsiMode,
    pub post_sequence_delay_ms: u64,
    pub inter_trial_ms: u64,
    pub response_deadline: ResponseDeadline,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            stimulus_ms: 1000,
            isi: IsiMode::Fixed { gap_ms: 500 },
            post_sequence_delay_ms: 1000,
            inter_trial_ms: 1500,
            response_deadline: ResponseDeadline::Unlimited,
        }
    }
}

impl TimingPolicy {
    /// Build the schedule for one sequence.
    ///
    /// Distance scaling reads the position set; sequence indices are assumed
    /// valid for it, which session validation guarantees for both reference
    /// material and random draws.
    pub fn plan(&self, sequence: &Sequence, positions: &[Position]) -> TimingPlan {
        let indices = sequence.indices();
        let mut steps = Vec::with_capacity(indices.len());
        for (item, &index) in indices.iter().enumerate() {
            let gap_ms = match indices.get(item + 1) {
                Some(&next) => self.gap_between(index, next, positions),
                None => self.post_sequence_delay_ms,
            };
            steps.push(TimingStep {
                show_ms: self.stimulus_ms,
                gap_ms,
            });
        }
        TimingPlan {
            steps,
            response_deadline: self.response_deadline,
            inter_trial_ms: self.inter_trial_ms,
        }
    }

    fn gap_between(&self, from: usize, to: usize, positions: &[Position]) -> u64 {
        match self.isi {
            IsiMode::Fixed { gap_ms } => gap_ms,
            IsiMode::DistanceScaled {
                base_ms,
                ms_per_unit,
            } => {
                let distance = positions[from].distance_to(&positions[to]);
                (base_ms as f64 + f64::from(distance) * f64::from(ms_per_unit)).round() as u64
            }
        }
    }
}
