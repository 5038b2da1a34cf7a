use anyhow::{bail, Context};
use clap::Parser;
use console::style;
use gate_puzzle::{Session, VerificationReport};
use gate_sim::{Circuit, GateId};
use itertools::Itertools;
use std::{path::PathBuf, time::Duration};

use super::common_args::{load_solution, SandboxOptions};
use crate::utils::{bit, print_status};

#[derive(Parser)]
#[command(name = "check", about = "Replay a solution against its puzzle and rate it")]
pub struct CheckCmd {
    #[clap(flatten, next_help_heading = "Sandbox Options")]
    options: SandboxOptions,
    /// The recorded solution (JSON).
    solution: PathBuf,
}

fn name_of(circuit: &Circuit, id: GateId) -> String {
    circuit
        .gate(id)
        .and_then(|g| g.label())
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

fn print_report(circuit: &Circuit, report: &VerificationReport) {
    for result in report.results() {
        let verdict = if result.passed {
            style("pass").green()
        } else {
            style("FAIL").red().bold()
        };
        let label = result
            .label
            .clone()
            .unwrap_or_else(|| format!("#{}", result.index));
        let actual = result
            .actual
            .iter()
            .map(|&(id, value)| match value {
                Some(v) => format!("{}={}", name_of(circuit, id), bit(v)),
                None => format!("{}=?", name_of(circuit, id)),
            })
            .join(" ");
        println!("{:>4}  {label:<12} {verdict}  {actual}", result.index);
    }
}

impl CheckCmd {
    pub fn run(self) -> anyhow::Result<()> {
        self.options.try_setup_logger();
        let spec = self.options.load_puzzle()?;
        let solution = load_solution(&self.solution)?;

        let mut session = Session::load(&spec)?.with_config(self.options.eval_config());
        solution.replay(&mut session)?;
        print_status(
            "Replayed",
            format_args!(
                "{} moves, {} placed gates",
                session.moves(),
                session.circuit().placed_gate_count()
            ),
        );

        let report = session.verify().context("could not run test vectors")?;
        print_report(session.circuit(), &report);
        if !report.is_solved() {
            bail!(
                "{} of {} vectors failed",
                report.results().len() - report.passed_count(),
                report.results().len()
            );
        }

        let elapsed = solution
            .elapsed_seconds
            .map(Duration::from_secs)
            .unwrap_or_else(|| session.elapsed());
        let stars = session
            .score_at(&report, elapsed)
            .context("puzzle has no scoring thresholds")?;
        print_status(
            "Solved",
            format_args!("{:?} in {} moves, {}s", spec.name, session.moves(), elapsed.as_secs()),
        );
        print_status(
            "Rated",
            format_args!(
                "{} / {} stars (moves: {}, gates: {}, time: {})",
                stars.stars(),
                stars.max_stars,
                bit(stars.few_moves),
                bit(stars.few_gates),
                bit(stars.fast)
            ),
        );
        Ok(())
    }
}
