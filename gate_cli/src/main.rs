use crate::{commands::*, utils::*};
use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;
mod solution;
mod utils;

#[derive(Parser)]
#[command(name = "gate-sandbox", author, about, version, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: SandboxCommands,
}

#[derive(Subcommand)]
enum SandboxCommands {
    Check(CheckCmd),
    Eval(EvalCmd),
}

fn main() {
    let result = match Cli::parse().command {
        SandboxCommands::Check(cmd) => cmd
            .run()
            .context("could not check solution due to previous error"),
        SandboxCommands::Eval(cmd) => cmd
            .run()
            .context("could not evaluate circuit due to previous error"),
    };
    if let Err(e) = result {
        print_error(e);
        std::process::exit(1);
    }
}
