mod error;
pub use error::PuzzleError;

mod puzzle;
pub use puzzle::{
    load_puzzle, FixtureGate, FixtureWire, PuzzleSpec, ScoreThresholds, TestVector,
    DEFAULT_MAX_STARS,
};

mod scorer;
pub use scorer::{score, score_breakdown, StarBreakdown};

mod session;
pub use session::Session;

mod truth_table;
pub use truth_table::truth_table;

mod verifier;
pub use verifier::{run_vector, verify, VectorResult, VerificationReport};
