use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::CircuitError, gate::GateKind};

/// Remaining placeable gates per kind.
///
/// Puzzles hand out a limited stock; the free-form sandbox uses `Unlimited`.
/// A kind missing from a limited inventory has nothing left.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inventory {
    #[default]
    Unlimited,
    Limited(BTreeMap<GateKind, u32>),
}

impl Inventory {
    pub fn unlimited() -> Self {
        Inventory::Unlimited
    }

    pub fn limited(counts: impl IntoIterator<Item = (GateKind, u32)>) -> Self {
        Inventory::Limited(counts.into_iter().collect())
    }

    /// Remaining count for `kind`, or `None` when the stock is unlimited.
    pub fn remaining(&self, kind: GateKind) -> Option<u32> {
        match self {
            Inventory::Unlimited => None,
            Inventory::Limited(counts) => Some(counts.get(&kind).copied().unwrap_or(0)),
        }
    }

    pub fn can_place(&self, kind: GateKind) -> bool {
        self.remaining(kind) != Some(0)
    }

    pub(crate) fn take(&mut self, kind: GateKind) -> Result<(), CircuitError> {
        match self {
            Inventory::Unlimited => Ok(()),
            Inventory::Limited(counts) => match counts.get_mut(&kind) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    Ok(())
                }
                _ => Err(CircuitError::InventoryExhausted(kind)),
            },
        }
    }

    pub(crate) fn restore(&mut self, kind: GateKind) {
        if let Inventory::Limited(counts) = self {
            *counts.entry(kind).or_insert(0) += 1;
        }
    }
}
