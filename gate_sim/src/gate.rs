use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The closed set of gates a circuit can be assembled from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Not,
    Xor,
    Nand,
    Nor,
    /// Primary input. No input slots, output set from outside.
    Switch,
    /// Observable sink. One input slot, no output socket.
    Output,
}
use GateKind::*;

/// A named input slot of a gate.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    In1,
    In2,
}

impl Slot {
    pub const fn index(self) -> usize {
        match self {
            Slot::In1 => 0,
            Slot::In2 => 1,
        }
    }
}

const NO_SLOTS: [Slot; 0] = [];
const ONE_SLOT: [Slot; 1] = [Slot::In1];
const TWO_SLOTS: [Slot; 2] = [Slot::In1, Slot::In2];

impl GateKind {
    /// Number of input slots.
    pub const fn arity(self) -> usize {
        match self {
            Switch => 0,
            Not | Output => 1,
            And | Or | Xor | Nand | Nor => 2,
        }
    }

    /// The input slots of this kind, in order.
    pub fn slots(self) -> &'static [Slot] {
        match self.arity() {
            0 => &NO_SLOTS,
            1 => &ONE_SLOT,
            _ => &TWO_SLOTS,
        }
    }

    pub fn accepts(self, slot: Slot) -> bool {
        slot.index() < self.arity()
    }

    /// Whether the gate has an output socket that connections can start from.
    pub const fn has_output(self) -> bool {
        !matches!(self, Output)
    }

    pub const fn is_switch(self) -> bool {
        matches!(self, Switch)
    }

    /// Apply the gate function to the values currently in its slots.
    ///
    /// One-input gates read `inputs[0]` only. Returns `None` for `Switch`,
    /// whose output is held rather than computed.
    pub const fn apply(self, inputs: [bool; 2]) -> Option<bool> {
        let [a, b] = inputs;
        let out = match self {
            And => a & b,
            Or => a | b,
            Not => !a,
            Xor => a ^ b,
            Nand => !(a & b),
            Nor => !(a | b),
            Output => a,
            Switch => return None,
        };
        Some(out)
    }
}
