use std::collections::BTreeMap;

use corsi_core::{Response, RoundResult, Sequence};
use corsi_sequence::{SequenceGenerator, SequenceOrigin};
use corsi_timing::TimingPlan;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, SessionConfig};
use crate::controller::{StaircaseController, StaircaseState, StaircaseStep};
use crate::report::{SessionReport, SessionSummary};

/// Host protocol misuse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no round is pending, request one with next_round first")]
    NoPendingRound,
}

/// One sequence ready for presentation, with everything the host needs to
/// run the trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRequest {
    pub length: usize,
    /// Zero-based trial index within the length block.
    pub trial: usize,
    pub sequence: Sequence,
    pub origin: SequenceOrigin,
    pub plan: TimingPlan,
}

/// What one submitted response did to the staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub length: usize,
    pub trial: usize,
    pub correct: bool,
    pub step: StaircaseStep,
}

/// A full assessment run.
///
/// Owns the validated configuration, the sequence generator, the staircase
/// and the random source, and exposes the two-call protocol a host runner
/// drives: `next_round` yields material, `submit_response` scores the answer
/// and moves the staircase. One `Session` per participant run; several may
/// coexist.
pub struct Session<R: Rng> {
    config: SessionConfig,
    generator: SequenceGenerator,
    controller: StaircaseController,
    rng: R,
    pending: Option<RoundRequest>,
}

impl<R: Rng> Session<R> {
    /// Validate the configuration and set up a session around it.
    pub fn new(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = SequenceGenerator::new(
            config.positions.len(),
            config.generation,
            config.avoid_repeats,
            config.reference.clone(),
        );
        let controller = StaircaseController::new(&config);
        Ok(Self {
            config,
            generator,
            controller,
            rng,
            pending: None,
        })
    }

    /// The next sequence to present, or `None` once the staircase is done.
    ///
    /// The same request comes back until its response is submitted, so the
    /// host may poll freely. After a halt this is the gate that keeps
    /// material for untested lengths from ever being generated.
    pub fn next_round(&mut self) -> Option<RoundRequest> {
        if let Some(pending) = &self.pending {
            return Some(pending.clone());
        }
        let StaircaseState::Testing { length } = self.controller.state() else {
            return None;
        };
        let trial = self.controller.trials_recorded();
        let (sequence, origin) = self.generator.generate(length, trial, &mut self.rng);
        let plan = self.config.timing.plan(&sequence, &self.config.positions);
        debug!(length, trial, origin = ?origin, "round prepared");
        let request = RoundRequest {
            length,
            trial,
            sequence,
            origin,
            plan,
        };
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Score the pending round's response and feed it to the staircase.
    pub fn submit_response(&mut self, response: Response) -> Result<RoundOutcome, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPendingRound)?;
        let result = RoundResult::score(pending.sequence, response);
        let correct = result.correct;
        let step = self.controller.record(result);
        Ok(RoundOutcome {
            length: pending.length,
            trial: pending.trial,
            correct,
            step,
        })
    }

    pub fn state(&self) -> StaircaseState {
        self.controller.state()
    }

    /// The settled span, `None` while the session is still running.
    pub fn span(&self) -> Option<usize> {
        self.controller.span()
    }

    pub fn is_done(&self) -> bool {
        self.controller.is_done()
    }

    /// Every recorded round so far, keyed by sequence length.
    pub fn history(&self) -> &BTreeMap<usize, Vec<RoundResult>> {
        self.controller.history()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The terminal report, `None` while the outcome is indeterminate.
    pub fn report(&self) -> Option<SessionReport> {
        let StaircaseState::Done { span, reason } = self.controller.state() else {
            return None;
        };
        Some(SessionReport {
            final_span: span,
            halt_reason: reason,
            history: self.controller.history().clone(),
        })
    }

    /// Descriptive statistics over everything answered so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_history(self.controller.history())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::ConfigError;

    fn session() -> Session<StdRng> {
        Session::new(SessionConfig::default(), StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn invalid_configs_are_rejected_before_any_material_exists() {
        let config = SessionConfig {
            trials_per_length: 0,
            ..SessionConfig::default()
        };
        let err = Session::new(config, StdRng::seed_from_u64(0)).err();
        assert_eq!(err, Some(ConfigError::NoTrials));
    }

    #[test]
    fn submitting_without_a_pending_round_is_an_error() {
        let mut session = session();
        assert_eq!(
            session.submit_response(Response::empty()),
            Err(SessionError::NoPendingRound)
        );
    }

    #[test]
    fn the_pending_round_is_stable_until_answered() {
        let mut session = session();
        let first = session.next_round().unwrap();
        let second = session.next_round().unwrap();
        assert_eq!(first, second);

        session
            .submit_response(Response::from_taps(first.sequence.indices().to_vec()))
            .unwrap();
        let third = session.next_round().unwrap();
        assert_eq!(third.trial, first.trial + 1);
    }

    #[test]
    fn trial_indices_count_within_a_block_and_reset_on_advance() {
        let mut session = session();
        let first = session.next_round().unwrap();
        assert_eq!((first.length, first.trial), (2, 0));
        session.submit_response(Response::empty()).unwrap();

        let second = session.next_round().unwrap();
        assert_eq!((second.length, second.trial), (2, 1));
        let echo = Response::from_taps(second.sequence.indices().to_vec());
        session.submit_response(echo).unwrap();

        let third = session.next_round().unwrap();
        assert_eq!((third.length, third.trial), (3, 0));
    }

    #[test]
    fn report_and_span_stay_indeterminate_until_terminal() {
        let mut session = session();
        assert_eq!(session.span(), None);
        assert!(session.report().is_none());

        session.next_round().unwrap();
        session.submit_response(Response::empty()).unwrap();
        assert_eq!(session.span(), None);
        assert!(session.report().is_none());
        assert!(!session.is_done());
    }

    #[test]
    fn the_plan_matches_the_served_sequence() {
        let mut session = session();
        let round = session.next_round().unwrap();
        assert_eq!(round.plan.steps.len(), round.sequence.len());
    }
}
