use console::style;
use std::{backtrace::BacktraceStatus, fmt::Display};

pub fn print_status(status: &str, msg: impl Display) {
    eprintln!("{:>12} {msg}", style(status).green().bold());
}

pub fn print_error(e: anyhow::Error) {
    for e in e.chain().rev() {
        eprintln!(
            "{}{} {}",
            style("error").red().bold(),
            style(":").white().bold(),
            e
        );
    }
    let bt = e.backtrace();
    if bt.status() == BacktraceStatus::Captured {
        eprintln!("error backtrace:");
        eprintln!("{bt}");
    }
}

pub fn bit(value: bool) -> u8 {
    value as u8
}
