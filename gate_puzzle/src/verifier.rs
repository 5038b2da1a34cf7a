use gate_sim::{evaluate, Circuit, CircuitError, EvalConfig, EvaluationSnapshot, GateId};
use itertools::Itertools;

use crate::puzzle::TestVector;

/// Outcome of one test vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorResult {
    pub index: usize,
    pub label: Option<String>,
    pub passed: bool,
    /// What each checked output actually showed. `None` if the gate is gone.
    pub actual: Vec<(GateId, Option<bool>)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    results: Vec<VectorResult>,
}

impl VerificationReport {
    pub fn new(results: Vec<VectorResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[VectorResult] {
        &self.results
    }

    /// Every vector passed.
    pub fn is_solved(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &VectorResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Evaluate `circuit` under the switch states of `vector`.
///
/// Works on a private deep copy; the caller's circuit is only read.
pub fn run_vector(
    circuit: &Circuit,
    vector: &TestVector,
    config: &EvalConfig,
) -> Result<EvaluationSnapshot, CircuitError> {
    let mut trial = circuit.clone();
    for &(switch, value) in &vector.inputs {
        trial.toggle_switch(switch, value)?;
    }
    Ok(evaluate(&trial, config))
}

/// Run every vector against an isolated copy of `circuit`.
///
/// Each vector starts from the live circuit, so results do not depend on
/// the order of the vectors. A vector naming a gate that is not a switch is
/// a malformed puzzle and aborts the run.
#[tracing::instrument(skip_all, name = "verify", fields(vectors = vectors.len()))]
pub fn verify(
    circuit: &Circuit,
    vectors: &[TestVector],
    config: &EvalConfig,
) -> Result<VerificationReport, CircuitError> {
    let results = vectors
        .iter()
        .enumerate()
        .map(|(index, vector)| {
            let snapshot = run_vector(circuit, vector, config)?;
            let actual = vector
                .expected
                .iter()
                .map(|&(id, _)| (id, snapshot.output(id)))
                .collect_vec();
            let passed = vector
                .expected
                .iter()
                .zip(&actual)
                .all(|(&(_, want), &(_, got))| got == Some(want));
            tracing::debug!("vector {index}: passed={passed}");
            Ok(VectorResult {
                index,
                label: vector.label.clone(),
                passed,
                actual,
            })
        })
        .collect::<Result<Vec<_>, CircuitError>>()?;
    Ok(VerificationReport { results })
}
