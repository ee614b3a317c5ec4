use corsi_core::Response;
use corsi_staircase::RoundRequest;
use rand::Rng;

/// A scripted participant with a known memory span.
///
/// Sequences up to `true_span` items are reproduced perfectly, except for
/// occasional lapses at `lapse_rate`; anything longer comes back garbled the
/// way real over-span attempts do (a correct prefix, then errors). Useful
/// for checking that the staircase converges on the span it was given.
pub struct SimulatedParticipant {
    true_span: usize,
    lapse_rate: f64,
    num_blocks: usize,
}

impl SimulatedParticipant {
    pub fn new(true_span: usize, lapse_rate: f64, num_blocks: usize) -> Self {
        Self {
            true_span,
            lapse_rate: lapse_rate.clamp(0.0, 1.0),
            num_blocks,
        }
    }

    pub fn respond<R: Rng>(&self, round: &RoundRequest, rng: &mut R) -> Response {
        let indices = round.sequence.indices();
        let remembers = round.length <= self.true_span && !rng.random_bool(self.lapse_rate);
        let taps = if remembers {
            indices.to_vec()
        } else {
            self.garble(indices, rng)
        };
        let tap_times_ms = self.tap_times(taps.len(), rng);
        Response::new(taps, tap_times_ms)
    }

    /// A plausible wrong answer, guaranteed to score incorrect: keep a
    /// prefix of what fit in memory, then either drop the tail outright or
    /// wander off to wrong blocks for the rest.
    fn garble<R: Rng>(&self, indices: &[usize], rng: &mut R) -> Vec<usize> {
        let keep = self.true_span.min(indices.len().saturating_sub(1));
        let mut taps: Vec<usize> = indices[..keep].to_vec();
        if rng.random_bool(0.5) {
            for &presented in &indices[keep..] {
                let wrong = loop {
                    let candidate = rng.random_range(0..self.num_blocks);
                    if candidate != presented {
                        break candidate;
                    }
                };
                taps.push(wrong);
            }
        }
        taps
    }

    /// Cumulative tap times, roughly half a second per tap with jitter.
    fn tap_times<R: Rng>(&self, taps: usize, rng: &mut R) -> Vec<u64> {
        let mut elapsed = 0;
        (0..taps)
            .map(|_| {
                elapsed += rng.random_range(350..750);
                elapsed
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use corsi_core::Sequence;
    use corsi_sequence::SequenceOrigin;
    use corsi_timing::TimingPolicy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn round(indices: Vec<usize>) -> RoundRequest {
        let sequence = Sequence::new(indices);
        let plan = TimingPolicy::default().plan(&sequence, &corsi_core::standard_nine());
        RoundRequest {
            length: sequence.len(),
            trial: 0,
            sequence,
            origin: SequenceOrigin::Random,
            plan,
        }
    }

    #[test]
    fn reproduces_sequences_within_span() {
        let participant = SimulatedParticipant::new(5, 0.0, 9);
        let mut rng = StdRng::seed_from_u64(2);
        let round = round(vec![0, 3, 6, 1]);
        let response = participant.respond(&round, &mut rng);
        assert_eq!(response.taps, round.sequence.indices());
        assert_eq!(response.tap_times_ms.len(), 4);
        assert!(response.tap_times_ms.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn garbles_every_attempt_beyond_span() {
        let participant = SimulatedParticipant::new(3, 0.0, 9);
        let mut rng = StdRng::seed_from_u64(2);
        let round = round(vec![0, 3, 6, 1, 8]);
        for _ in 0..32 {
            let response = participant.respond(&round, &mut rng);
            assert_ne!(response.taps, round.sequence.indices());
        }
    }

    #[test]
    fn a_lapse_free_participant_settles_at_their_true_span() {
        use corsi_staircase::{Session, SessionConfig};

        for true_span in 2..=8 {
            let participant = SimulatedParticipant::new(true_span, 0.0, 9);
            let mut session =
                Session::new(SessionConfig::default(), StdRng::seed_from_u64(21)).unwrap();
            let mut rng = StdRng::seed_from_u64(33);
            while let Some(round) = session.next_round() {
                let response = participant.respond(&round, &mut rng);
                session.submit_response(response).unwrap();
            }
            assert_eq!(session.span(), Some(true_span));
        }
    }

    #[test]
    fn always_lapsing_fails_even_short_sequences() {
        let participant = SimulatedParticipant::new(9, 1.0, 9);
        let mut rng = StdRng::seed_from_u64(7);
        let round = round(vec![4, 2]);
        for _ in 0..32 {
            let response = participant.respond(&round, &mut rng);
            assert_ne!(response.taps, round.sequence.indices());
        }
    }
}
