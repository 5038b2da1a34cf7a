use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{
    circuit::Circuit,
    ids::{GateId, SlotRef},
};

/// Default bound on relaxation passes.
///
/// Feedback loops may never settle (an odd ring of inverters oscillates), so
/// evaluation gives up after this many passes and reports whatever state it
/// reached. The cap is a cost bound, not a convergence guarantee.
pub const MAX_ITERATIONS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    pub max_iterations: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// Gate values after one evaluation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationSnapshot {
    outputs: BTreeMap<GateId, bool>,
    inputs: BTreeMap<GateId, [bool; 2]>,
    passes: usize,
    converged: bool,
}

impl EvaluationSnapshot {
    pub fn output(&self, id: GateId) -> Option<bool> {
        self.outputs.get(&id).copied()
    }

    pub fn inputs(&self, id: GateId) -> Option<[bool; 2]> {
        self.inputs.get(&id).copied()
    }

    pub fn outputs(&self) -> impl Iterator<Item = (GateId, bool)> + '_ {
        self.outputs.iter().map(|(&id, &v)| (id, v))
    }

    /// Number of relaxation passes that ran.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Whether the returned outputs are a fixed point of the circuit.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

/// Iterative relaxation over a circuit, one pass at a time.
///
/// Starts cold: switches hold their current state, every other gate outputs
/// `false`. Each pass visits the non-switch gates in id order and recomputes
/// their outputs from the current values on their input slots; a changed
/// output is visible to gates visited later in the same pass.
pub struct Relaxation<'a> {
    circuit: &'a Circuit,
    /// The connection driving each slot. When several connections target the
    /// same slot the most recently created one wins.
    drivers: HashMap<SlotRef, GateId>,
    outputs: BTreeMap<GateId, bool>,
    passes: usize,
}

impl<'a> Relaxation<'a> {
    pub fn new(circuit: &'a Circuit) -> Self {
        let drivers = circuit
            .connections()
            .map(|conn| (conn.target, conn.source))
            .collect();
        let outputs = circuit
            .gates()
            .map(|g| (g.id(), g.kind().is_switch() && g.output()))
            .collect();
        Self {
            circuit,
            drivers,
            outputs,
            passes: 0,
        }
    }

    /// Value currently flowing into `slot`; unconnected slots read `false`.
    fn slot_value(&self, slot: SlotRef) -> bool {
        self.drivers
            .get(&slot)
            .and_then(|src| self.outputs.get(src))
            .copied()
            .unwrap_or(false)
    }

    fn gate_inputs(&self, id: GateId) -> [bool; 2] {
        let mut inputs = [false; 2];
        if let Some(gate) = self.circuit.gate(id) {
            for &slot in gate.kind().slots() {
                inputs[slot.index()] = self.slot_value(SlotRef::new(id, slot));
            }
        }
        inputs
    }

    /// Run one pass. Returns whether any output changed.
    pub fn pass(&mut self) -> bool {
        let circuit = self.circuit;
        let mut changed = false;
        for gate in circuit.gates() {
            let Some(out) = gate.kind().apply(self.gate_inputs(gate.id())) else {
                continue;
            };
            if let Some(prev) = self.outputs.insert(gate.id(), out) {
                changed |= prev != out;
            }
        }
        self.passes += 1;
        tracing::trace!("pass {}: changed={changed}", self.passes);
        changed
    }

    /// Whether another pass would leave every output as it is. Read-only,
    /// and not counted as a pass.
    pub fn is_fixed_point(&self) -> bool {
        self.circuit.gates().all(|gate| {
            gate.kind()
                .apply(self.gate_inputs(gate.id()))
                .map_or(true, |out| self.outputs.get(&gate.id()) == Some(&out))
        })
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn outputs(&self) -> &BTreeMap<GateId, bool> {
        &self.outputs
    }

    pub fn into_snapshot(self, converged: bool) -> EvaluationSnapshot {
        // Slot values are read back from the final outputs, so the displayed
        // wires agree with their drivers even when the loop was cut short.
        let inputs = self
            .circuit
            .gates()
            .map(|g| (g.id(), self.gate_inputs(g.id())))
            .collect();
        EvaluationSnapshot {
            outputs: self.outputs,
            inputs,
            passes: self.passes,
            converged,
        }
    }
}

/// Compute the steady-state output of every gate by bounded fixed-point
/// iteration.
///
/// Never fails: a circuit that does not settle within
/// `config.max_iterations` passes yields its transient state, with
/// [`EvaluationSnapshot::converged`] unset. The flag is set whenever the
/// returned state is a fixed point, even if no confirming pass ran.
pub fn evaluate(circuit: &Circuit, config: &EvalConfig) -> EvaluationSnapshot {
    let mut relax = Relaxation::new(circuit);
    let mut converged = false;
    while relax.passes() < config.max_iterations {
        if !relax.pass() {
            converged = true;
            break;
        }
    }
    // The last allowed pass may itself have landed on the fixed point.
    converged = converged || relax.is_fixed_point();
    if !converged {
        tracing::debug!(
            "no fixed point after {} passes over {} gates",
            relax.passes(),
            circuit.len()
        );
    }
    relax.into_snapshot(converged)
}
