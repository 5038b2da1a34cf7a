mod circuit;
pub use circuit::{Circuit, Connection, Gate};

mod error;
pub use error::CircuitError;

mod eval;
pub use eval::{evaluate, EvalConfig, EvaluationSnapshot, Relaxation, MAX_ITERATIONS};

mod gate;
pub use gate::{GateKind, Slot};

mod ids;
pub use ids::{ConnectionId, GateId, SlotRef};

mod inventory;
pub use inventory::Inventory;
