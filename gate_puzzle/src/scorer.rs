use std::time::Duration;

use crate::{puzzle::ScoreThresholds, verifier::VerificationReport};

/// Which stars a completion earned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StarBreakdown {
    pub solved: bool,
    pub few_moves: bool,
    pub few_gates: bool,
    pub fast: bool,
    pub max_stars: u8,
}

impl StarBreakdown {
    /// One star for solving plus one per bonus, capped at the displayed maximum.
    pub fn stars(&self) -> u8 {
        if !self.solved {
            return 0;
        }
        let bonuses = [self.few_moves, self.few_gates, self.fast]
            .into_iter()
            .filter(|&b| b)
            .count() as u8;
        (1 + bonuses).min(self.max_stars)
    }
}

pub fn score_breakdown(
    report: &VerificationReport,
    moves: u32,
    gate_count: usize,
    elapsed: Duration,
    thresholds: &ScoreThresholds,
) -> StarBreakdown {
    let solved = report.is_solved();
    StarBreakdown {
        solved,
        few_moves: solved && moves <= thresholds.max_moves,
        few_gates: solved && gate_count <= thresholds.max_gates as usize,
        fast: solved && elapsed <= Duration::from_secs(thresholds.max_seconds),
        max_stars: thresholds.max_stars,
    }
}

/// Star rating for a verification run. Zero unless every vector passed.
pub fn score(
    report: &VerificationReport,
    moves: u32,
    gate_count: usize,
    elapsed: Duration,
    thresholds: &ScoreThresholds,
) -> u8 {
    score_breakdown(report, moves, gate_count, elapsed, thresholds).stars()
}
