use gate_sim::{CircuitError, GateId, GateKind};
use thiserror::Error;

/// A puzzle definition that cannot be loaded as written.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error("fixture id {0} is used twice")]
    DuplicateFixture(GateId),
    #[error("fixture label {0:?} is used twice")]
    DuplicateLabel(String),
    #[error("vector {vector} refers to unknown fixture {gate}")]
    UnknownFixture { vector: usize, gate: GateId },
    #[error("vector {vector} expects {gate} to be a {expected} fixture")]
    WrongFixtureKind {
        vector: usize,
        gate: GateId,
        expected: GateKind,
    },
}
