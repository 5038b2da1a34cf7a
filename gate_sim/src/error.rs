use thiserror::Error;

use crate::{
    gate::GateKind,
    ids::{ConnectionId, GateId},
};

/// Rejected structural edit. The circuit is left untouched in every case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("no {0} gates left in the inventory")]
    InventoryExhausted(GateKind),
    #[error("gate {0} is locked")]
    GateLocked(GateId),
    #[error("invalid socket: {reason}")]
    InvalidSocket { reason: String },
    #[error("gate {0} is not a switch")]
    NotASwitch(GateId),
    #[error("gate id {0} is already taken")]
    DuplicateGate(GateId),
    #[error("gate id {0} is out of range")]
    IdOutOfRange(GateId),
    #[error("no ids left to allocate")]
    IdsExhausted,
    #[error("label {0:?} is already in use")]
    DuplicateLabel(String),
    #[error("unknown gate {0}")]
    UnknownGate(GateId),
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
}

impl CircuitError {
    pub(crate) fn invalid_socket(reason: impl Into<String>) -> Self {
        CircuitError::InvalidSocket {
            reason: reason.into(),
        }
    }
}
