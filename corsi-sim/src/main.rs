mod participant;

use anyhow::{Context, Result};
use corsi_staircase::{Session, SessionConfig};
use participant::SimulatedParticipant;

/// Drives one full session with a simulated participant and prints the
/// summary plus the JSON report. Usage: `corsi-sim [true_span] [lapse_rate]`.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let true_span: usize = match args.next() {
        Some(raw) => raw.parse().context("true_span must be a whole number")?,
        None => 5,
    };
    let lapse_rate: f64 = match args.next() {
        Some(raw) => raw.parse().context("lapse_rate must be a number in 0..1")?,
        None => 0.05,
    };

    let config = SessionConfig::default();
    let participant = SimulatedParticipant::new(true_span, lapse_rate, config.positions.len());
    let mut session = Session::new(config, rand::rng())?;
    let mut participant_rng = rand::rng();

    println!("=== CORSI SPAN SIMULATION ===");
    println!(
        "Simulated participant: true span {}, lapse rate {:.0}%\n",
        true_span,
        lapse_rate * 100.0
    );

    while let Some(round) = session.next_round() {
        let response = participant.respond(&round, &mut participant_rng);
        let outcome = session.submit_response(response)?;
        println!(
            "length {} trial {}: {} ({:.1}s presentation)",
            round.length,
            round.trial + 1,
            if outcome.correct { "correct" } else { "incorrect" },
            round.plan.presentation_ms() as f64 / 1000.0
        );
    }

    let summary = session.summary();
    println!("\nSession Results:");
    println!(
        "Rounds: {}, correct: {} ({:.1}%)",
        summary.rounds,
        summary.correct_rounds,
        summary.correct_rounds as f64 / summary.rounds as f64 * 100.0
    );
    for (length, counts) in &summary.per_length {
        println!(
            "  length {}: {}/{} correct",
            length, counts.correct, counts.trials
        );
    }
    if let Some(mean) = summary.mean_tap_time_ms {
        println!("Mean tap time: {:.0} ms", mean);
    }

    let report = session
        .report()
        .context("session ended without a terminal report")?;
    println!(
        "\nFinal span: {} ({})",
        report.final_span, report.halt_reason
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
