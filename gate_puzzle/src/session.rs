use gate_sim::{
    Circuit, CircuitError, Connection, ConnectionId, EvalConfig, EvaluationSnapshot, Gate, GateId,
    GateKind, SlotRef,
};
use std::time::{Duration, Instant};

use crate::{
    error::PuzzleError,
    puzzle::{load_puzzle, PuzzleSpec, ScoreThresholds, TestVector},
    scorer::{score_breakdown, StarBreakdown},
    verifier::{verify, VerificationReport},
};

/// The single owner of a circuit being edited.
///
/// Every successful structural edit counts as one move, and the circuit is
/// re-evaluated after each edit or switch toggle so its displayed state is
/// current.
pub struct Session {
    name: String,
    circuit: Circuit,
    vectors: Vec<TestVector>,
    /// `None` in the free-form sandbox, which has nothing to score.
    thresholds: Option<ScoreThresholds>,
    config: EvalConfig,
    snapshot: EvaluationSnapshot,
    moves: u32,
    started_at: Instant,
}

impl Session {
    /// Open a puzzle: fresh fixtures, full inventory, zero moves, clock
    /// started now.
    pub fn load(spec: &PuzzleSpec) -> Result<Self, PuzzleError> {
        let circuit = load_puzzle(spec)?;
        tracing::info!("opened puzzle {:?}", spec.name);
        Ok(Self::from_parts(
            spec.name.clone(),
            circuit,
            spec.vectors.clone(),
            Some(spec.thresholds),
        ))
    }

    /// Free-form wiring with an unlimited inventory and no target table.
    pub fn sandbox() -> Self {
        Self::from_parts("sandbox".to_string(), Circuit::sandbox(), vec![], None)
    }

    fn from_parts(
        name: String,
        mut circuit: Circuit,
        vectors: Vec<TestVector>,
        thresholds: Option<ScoreThresholds>,
    ) -> Self {
        let config = EvalConfig::default();
        let snapshot = circuit.settle(&config);
        Self {
            name,
            circuit,
            vectors,
            thresholds,
            config,
            snapshot,
            moves: 0,
            started_at: Instant::now(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self.refresh();
        self
    }

    fn refresh(&mut self) {
        self.snapshot = self.circuit.settle(&self.config);
    }

    fn count_move<T>(&mut self, result: Result<T, CircuitError>) -> Result<T, CircuitError> {
        let value = result?;
        self.moves += 1;
        self.refresh();
        Ok(value)
    }

    /// Place a player gate from the inventory.
    pub fn add_gate(&mut self, kind: GateKind) -> Result<GateId, CircuitError> {
        let result = self.circuit.add_gate(kind, false);
        self.count_move(result)
    }

    /// Place a player gate under a label. Labels must be unique in the
    /// circuit, fixtures included.
    pub fn add_labeled_gate(
        &mut self,
        kind: GateKind,
        label: impl Into<String>,
    ) -> Result<GateId, CircuitError> {
        let result = self.circuit.add_labeled_gate(kind, Some(label.into()), false);
        self.count_move(result)
    }

    pub fn remove_gate(&mut self, id: GateId) -> Result<Gate, CircuitError> {
        let result = self.circuit.remove_gate(id);
        self.count_move(result)
    }

    pub fn connect(
        &mut self,
        source: GateId,
        target: SlotRef,
    ) -> Result<ConnectionId, CircuitError> {
        let result = self.circuit.connect(source, target);
        self.count_move(result)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> Result<Connection, CircuitError> {
        let result = self.circuit.disconnect(id);
        self.count_move(result)
    }

    /// Flip a switch. Not a move.
    pub fn toggle_switch(&mut self, id: GateId, value: bool) -> Result<(), CircuitError> {
        self.circuit.toggle_switch(id, value)?;
        self.refresh();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Result of the latest re-evaluation.
    pub fn snapshot(&self) -> &EvaluationSnapshot {
        &self.snapshot
    }

    pub fn vectors(&self) -> &[TestVector] {
        &self.vectors
    }

    pub fn thresholds(&self) -> Option<&ScoreThresholds> {
        self.thresholds.as_ref()
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn is_sandbox(&self) -> bool {
        self.thresholds.is_none()
    }

    /// Run the puzzle's vectors. The live circuit is left as it is.
    pub fn verify(&self) -> Result<VerificationReport, CircuitError> {
        verify(&self.circuit, &self.vectors, &self.config)
    }

    /// Rate a report as if `elapsed` had passed since the puzzle opened.
    /// `None` in the sandbox.
    pub fn score_at(&self, report: &VerificationReport, elapsed: Duration) -> Option<StarBreakdown> {
        self.thresholds.as_ref().map(|thresholds| {
            score_breakdown(
                report,
                self.moves,
                self.circuit.placed_gate_count(),
                elapsed,
                thresholds,
            )
        })
    }

    /// Rate a report against the wall clock.
    pub fn score(&self, report: &VerificationReport) -> Option<StarBreakdown> {
        self.score_at(report, self.elapsed())
    }
}
