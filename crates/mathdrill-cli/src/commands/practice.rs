//! The `mathdrill practice` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use mathdrill_core::markup::to_plain;
use mathdrill_core::random::create_rng;
use mathdrill_core::statistics::SessionSummary;
use mathdrill_core::{PracticeSession, SubmitOutcome};

pub fn execute(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    suppliers: Vec<String>,
    format: String,
) -> Result<()> {
    if !matches!(format.as_str(), "text" | "json") {
        anyhow::bail!("unknown format '{format}', expected text or json");
    }
    let config = super::load_with_overrides(config_path, seed, suppliers)?;
    let composite = config.build_composite()?;
    info!(suppliers = composite.len(), seed = ?config.seed, "starting practice session");

    let mut session =
        PracticeSession::new(composite, create_rng(config.seed), config.session_options());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), stdout.lock())?;

    let summary = session.history().summary();
    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_summary(&summary),
    }
    Ok(())
}

/// Drive `session` from `input` until `q` or end of input.
fn run(session: &mut PracticeSession, input: impl BufRead, mut out: impl Write) -> Result<()> {
    if session.next_problem()?.is_none() {
        writeln!(out, "No suppliers selected, nothing to practice.")?;
        return Ok(());
    }
    writeln!(out, "Commands: a = show answer, c = clear, s = skill, q = quit")?;
    show_problem(session, &mut out)?;

    for line in input.lines() {
        let line = line.context("failed to read answer")?;
        match line.trim() {
            "q" => break,
            "a" => {
                if let Some(answer) = session.show_answer() {
                    writeln!(out, "Answer: {answer}")?;
                }
            }
            "c" => {
                session.note_cleared();
                writeln!(out, "Cleared.")?;
            }
            "s" => {
                if let Some(skill) = session.skill() {
                    writeln!(out, "Skill: {skill}")?;
                }
            }
            answer => match session.submit(answer)? {
                SubmitOutcome::Ignored => {}
                SubmitOutcome::NoProblem => {
                    writeln!(out, "No problem to answer.")?;
                    break;
                }
                SubmitOutcome::Correct { strictly, time } => {
                    let note = if strictly { "" } else { " (not counted as strict)" };
                    writeln!(out, "Correct! {:.1}s{note}", time.as_secs_f64())?;
                    show_problem(session, &mut out)?;
                }
                SubmitOutcome::Incorrect { wrong_answers } => {
                    writeln!(out, "Incorrect, try again. ({wrong_answers} wrong)")?;
                }
            },
        }
    }
    Ok(())
}

fn show_problem(session: &PracticeSession, out: &mut impl Write) -> io::Result<()> {
    match session.current() {
        Some(problem) => {
            let mut line = to_plain(problem.display_string());
            if let Some(tolerance) = problem.tolerance() {
                line.push_str(&format!("  (within {tolerance})"));
            }
            writeln!(out, "\n{line}")
        }
        None => Ok(()),
    }
}

fn print_summary(summary: &SessionSummary) {
    println!(
        "\nSolved {} ({} strictly)",
        summary.solved, summary.strictly_solved
    );
    if let Some(accuracy) = summary.accuracy_percent {
        println!("Accuracy: {accuracy:.0}%");
    }
    if let Some(average) = summary.average_time_secs {
        println!("Average time: {average:.1}s");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdrill_core::{BigFraction, CompositeSupplier, Problem, SessionOptions};
    use mathdrill_suppliers::mock::FixedSupplier;

    fn session() -> PracticeSession {
        let problem = Problem::exact("6 × 7", BigFraction::from(42)).unwrap();
        let mut composite = CompositeSupplier::new();
        composite.add_supplier(Box::new(FixedSupplier::with_problem("Fixed", problem)));
        PracticeSession::new(composite, create_rng(Some(3)), SessionOptions::default())
    }

    fn transcript(session: &mut PracticeSession, input: &str) -> String {
        let mut out = Vec::new();
        run(session, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn answers_and_commands() {
        let mut session = session();
        let out = transcript(&mut session, "41\ns\n42\na\n42\nq\n6\n");
        assert!(out.contains("6 × 7"));
        assert!(out.contains("Incorrect, try again. (1 wrong)"));
        assert!(out.contains("Skill: Fixed"));
        assert!(out.contains("Answer: 42"));
        assert!(out.contains("(not counted as strict)"));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().strict_count(), 0);
    }

    #[test]
    fn strict_solve_counts() {
        let mut session = session();
        transcript(&mut session, "\n42\n");
        assert_eq!(session.history().strict_count(), 1);
    }

    #[test]
    fn empty_session_says_so() {
        let mut session = PracticeSession::new(
            CompositeSupplier::new(),
            create_rng(Some(3)),
            SessionOptions::default(),
        );
        let out = transcript(&mut session, "1\n");
        assert!(out.contains("nothing to practice"));
    }
}
