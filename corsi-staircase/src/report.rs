use std::collections::BTreeMap;
use std::fmt;

use corsi_core::RoundResult;
use serde::{Deserialize, Serialize};

/// Why a session stopped testing longer sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HaltReason {
    /// Every trial at a single length was answered incorrectly.
    BothTrialsFailed,
    /// The configured run of consecutive incorrect answers was reached.
    ConsecutiveErrors,
    /// The longest configured length was completed without a stop rule
    /// firing. A ceiling finish, not a failure.
    MaxLengthReached,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HaltReason::BothTrialsFailed => "both-trials-failed",
            HaltReason::ConsecutiveErrors => "consecutive-errors",
            HaltReason::MaxLengthReached => "max-length-reached",
        };
        f.write_str(label)
    }
}

/// Terminal session output: the settled span, why testing stopped, and
/// every recorded round keyed by sequence length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub final_span: usize,
    pub halt_reason: HaltReason,
    pub history: BTreeMap<usize, Vec<RoundResult>>,
}

/// Per-length trial and correctness counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthSummary {
    pub trials: usize,
    pub correct: usize,
}

/// Descriptive statistics over the rounds answered so far. Unlike the
/// report this is available at any point, terminal or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub rounds: usize,
    pub correct_rounds: usize,
    pub per_length: BTreeMap<usize, LengthSummary>,
    /// Mean of all host-reported tap times, `None` when no taps were timed.
    pub mean_tap_time_ms: Option<f64>,
}

impl SessionSummary {
    pub fn from_history(history: &BTreeMap<usize, Vec<RoundResult>>) -> Self {
        let mut rounds = 0;
        let mut correct_rounds = 0;
        let mut per_length = BTreeMap::new();
        let mut tap_time_sum: u64 = 0;
        let mut tap_count: usize = 0;

        for (&length, results) in history {
            let correct = results.iter().filter(|r| r.correct).count();
            per_length.insert(
                length,
                LengthSummary {
                    trials: results.len(),
                    correct,
                },
            );
            rounds += results.len();
            correct_rounds += correct;
            for result in results {
                for &tap_ms in &result.response.tap_times_ms {
                    tap_time_sum += tap_ms;
                    tap_count += 1;
                }
            }
        }

        let mean_tap_time_ms = (tap_count > 0).then(|| tap_time_sum as f64 / tap_count as f64);
        Self {
            rounds,
            correct_rounds,
            per_length,
            mean_tap_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use corsi_core::{Response, Sequence};
    use serde_json::json;

    use super::*;

    fn history_of_two_lengths() -> BTreeMap<usize, Vec<RoundResult>> {
        let mut history = BTreeMap::new();
        history.insert(
            2,
            vec![
                RoundResult::score(
                    Sequence::new(vec![0, 1]),
                    Response::new(vec![0, 1], vec![400, 800]),
                ),
                RoundResult::score(
                    Sequence::new(vec![2, 3]),
                    Response::new(vec![2, 3], vec![500, 900]),
                ),
            ],
        );
        history.insert(
            3,
            vec![RoundResult::score(
                Sequence::new(vec![4, 5, 6]),
                Response::from_taps(vec![6, 5, 4]),
            )],
        );
        history
    }

    #[test]
    fn halt_reasons_use_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(HaltReason::BothTrialsFailed).unwrap(),
            json!("both-trials-failed")
        );
        assert_eq!(
            serde_json::to_value(HaltReason::ConsecutiveErrors).unwrap(),
            json!("consecutive-errors")
        );
        assert_eq!(
            serde_json::to_value(HaltReason::MaxLengthReached).unwrap(),
            json!("max-length-reached")
        );
    }

    #[test]
    fn display_matches_the_wire_labels() {
        assert_eq!(HaltReason::MaxLengthReached.to_string(), "max-length-reached");
    }

    #[test]
    fn report_serializes_with_camel_case_fields() {
        let report = SessionReport {
            final_span: 2,
            halt_reason: HaltReason::BothTrialsFailed,
            history: history_of_two_lengths(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["finalSpan"], json!(2));
        assert_eq!(value["haltReason"], json!("both-trials-failed"));
        assert_eq!(value["history"]["2"].as_array().unwrap().len(), 2);
        assert_eq!(value["history"]["3"][0]["correct"], json!(false));
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = SessionReport {
            final_span: 3,
            halt_reason: HaltReason::MaxLengthReached,
            history: history_of_two_lengths(),
        };
        let text = serde_json::to_string(&report).unwrap();
        let back: SessionReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn summary_counts_rounds_and_averages_tap_times() {
        let summary = SessionSummary::from_history(&history_of_two_lengths());
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.correct_rounds, 2);
        assert_eq!(
            summary.per_length[&2],
            LengthSummary {
                trials: 2,
                correct: 2
            }
        );
        assert_eq!(
            summary.per_length[&3],
            LengthSummary {
                trials: 1,
                correct: 0
            }
        );
        // (400 + 800 + 500 + 900) / 4
        assert_eq!(summary.mean_tap_time_ms, Some(650.0));
    }

    #[test]
    fn summary_of_an_untimed_session_has_no_mean() {
        let mut history = BTreeMap::new();
        history.insert(
            2,
            vec![RoundResult::score(
                Sequence::new(vec![0, 1]),
                Response::from_taps(vec![0, 1]),
            )],
        );
        let summary = SessionSummary::from_history(&history);
        assert_eq!(summary.mean_tap_time_ms, None);
    }
}
