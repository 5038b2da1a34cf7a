use anyhow::{bail, Context};
use clap::Parser;
use console::style;
use gate_puzzle::Session;
use std::path::PathBuf;

use super::common_args::{load_solution, SandboxOptions};
use crate::utils::{bit, print_status};

#[derive(Parser)]
#[command(name = "eval", about = "Evaluate a puzzle circuit once and print every gate")]
pub struct EvalCmd {
    #[clap(flatten, next_help_heading = "Sandbox Options")]
    options: SandboxOptions,
    /// A solution to replay before evaluating.
    #[arg(long)]
    solution: Option<PathBuf>,
    /// Switch assignments, e.g. `--set A=1 --set B=0`.
    #[arg(long = "set", value_parser = parse_assignment)]
    assignments: Vec<(String, bool)>,
}

fn parse_assignment(s: &str) -> anyhow::Result<(String, bool)> {
    let (label, value) = s
        .split_once('=')
        .with_context(|| format!("expected LABEL=0|1, got {s:?}"))?;
    let value = match value {
        "0" | "false" => false,
        "1" | "true" => true,
        other => bail!("switch value must be 0 or 1, got {other:?}"),
    };
    Ok((label.to_string(), value))
}

impl EvalCmd {
    pub fn run(self) -> anyhow::Result<()> {
        self.options.try_setup_logger();
        let spec = self.options.load_puzzle()?;
        let mut session = Session::load(&spec)?.with_config(self.options.eval_config());
        if let Some(path) = &self.solution {
            load_solution(path)?.replay(&mut session)?;
        }

        for (label, value) in &self.assignments {
            let id = session
                .circuit()
                .gate_by_label(label)
                .map(|g| g.id())
                .with_context(|| format!("no gate labeled {label:?}"))?;
            session.toggle_switch(id, *value)?;
        }

        for gate in session.circuit().gates() {
            let [in1, in2] = gate.inputs();
            let inputs = match gate.kind().arity() {
                0 => String::new(),
                1 => format!("{}", bit(in1)),
                _ => format!("{}{}", bit(in1), bit(in2)),
            };
            let output = if gate.output() {
                style("1").green().bold()
            } else {
                style("0").dim()
            };
            println!(
                "{:>4}  {:<8} {:<6} {:>2} -> {output}",
                gate.id().to_string(),
                gate.label().unwrap_or(""),
                gate.kind().to_string(),
                inputs
            );
        }

        let snapshot = session.snapshot();
        if snapshot.converged() {
            print_status("Settled", format_args!("after {} passes", snapshot.passes()));
        } else {
            eprintln!(
                "{:>12} no fixed point after {} passes; showing the last state",
                style("warning").yellow().bold(),
                snapshot.passes()
            );
        }
        Ok(())
    }
}
