use gate_sim::{Circuit, GateId, GateKind, Inventory, SlotRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::PuzzleError;

/// A locked gate the puzzle provides, typically a switch or an output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureGate {
    pub id: GateId,
    pub kind: GateKind,
    #[serde(default)]
    pub label: Option<String>,
}

/// A connection that is already in place when the puzzle opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureWire {
    pub source: GateId,
    pub target: SlotRef,
}

/// One row of the target truth table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVector {
    #[serde(default)]
    pub label: Option<String>,
    /// Switch states to apply, in order.
    pub inputs: Vec<(GateId, bool)>,
    /// Values the output sinks must show.
    pub expected: Vec<(GateId, bool)>,
}

impl TestVector {
    pub fn new(inputs: Vec<(GateId, bool)>, expected: Vec<(GateId, bool)>) -> Self {
        Self {
            label: None,
            inputs,
            expected,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

pub const DEFAULT_MAX_STARS: u8 = 3;

fn default_max_stars() -> u8 {
    DEFAULT_MAX_STARS
}

/// Per-puzzle limits for the bonus stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub max_moves: u32,
    pub max_gates: u32,
    pub max_seconds: u64,
    /// Highest rating the puzzle displays.
    #[serde(default = "default_max_stars")]
    pub max_stars: u8,
}

impl ScoreThresholds {
    pub fn new(max_moves: u32, max_gates: u32, max_seconds: u64) -> Self {
        Self {
            max_moves,
            max_gates,
            max_seconds,
            max_stars: DEFAULT_MAX_STARS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub name: String,
    #[serde(default)]
    pub inventory: Inventory,
    pub fixtures: Vec<FixtureGate>,
    #[serde(default)]
    pub wires: Vec<FixtureWire>,
    pub vectors: Vec<TestVector>,
    pub thresholds: ScoreThresholds,
}

impl PuzzleSpec {
    /// Check that fixture ids and labels are unique and that every vector
    /// drives switch fixtures and reads output fixtures.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let mut kinds = BTreeMap::new();
        let mut labels = BTreeSet::new();
        for fixture in &self.fixtures {
            if kinds.insert(fixture.id, fixture.kind).is_some() {
                return Err(PuzzleError::DuplicateFixture(fixture.id));
            }
            if let Some(label) = &fixture.label {
                if !labels.insert(label.as_str()) {
                    return Err(PuzzleError::DuplicateLabel(label.clone()));
                }
            }
        }

        let check = |vector: usize, gate: GateId, expected: GateKind| match kinds.get(&gate) {
            None => Err(PuzzleError::UnknownFixture { vector, gate }),
            Some(&kind) if kind != expected => Err(PuzzleError::WrongFixtureKind {
                vector,
                gate,
                expected,
            }),
            Some(_) => Ok(()),
        };
        for (i, vector) in self.vectors.iter().enumerate() {
            for &(gate, _) in &vector.inputs {
                check(i, gate, GateKind::Switch)?;
            }
            for &(gate, _) in &vector.expected {
                check(i, gate, GateKind::Output)?;
            }
        }
        Ok(())
    }

    /// Output fixtures that at least one vector checks.
    pub fn checked_outputs(&self) -> BTreeSet<GateId> {
        self.vectors
            .iter()
            .flat_map(|v| v.expected.iter().map(|&(id, _)| id))
            .collect()
    }
}

/// Seed a fresh circuit from the puzzle's locked fixtures and install its
/// inventory. Fixtures do not draw from the inventory.
pub fn load_puzzle(spec: &PuzzleSpec) -> Result<Circuit, PuzzleError> {
    spec.validate()?;

    let mut circuit = Circuit::new(Inventory::Limited(Default::default()));
    for fixture in &spec.fixtures {
        circuit.place_fixture(fixture.id, fixture.kind, fixture.label.clone())?;
    }
    for wire in &spec.wires {
        circuit.connect(wire.source, wire.target)?;
    }
    circuit.set_inventory(spec.inventory.clone());
    tracing::debug!(
        "loaded puzzle {:?}: {} fixtures, {} wires, {} vectors",
        spec.name,
        spec.fixtures.len(),
        spec.wires.len(),
        spec.vectors.len()
    );
    Ok(circuit)
}
