use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    error::CircuitError,
    eval::{evaluate, EvalConfig, EvaluationSnapshot},
    gate::GateKind,
    ids::{ConnectionId, GateId, SlotRef},
    inventory::Inventory,
};

/// A placed gate and its currently displayed state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    id: GateId,
    kind: GateKind,
    label: Option<String>,
    /// Values last seen in `in1` / `in2`. Unused slots stay `false`.
    inputs: [bool; 2],
    output: bool,
    locked: bool,
}

impl Gate {
    fn new(id: GateId, kind: GateKind, label: Option<String>, locked: bool) -> Self {
        Self {
            id,
            kind,
            label,
            inputs: [false; 2],
            output: false,
            locked,
        }
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn inputs(&self) -> [bool; 2] {
        self.inputs
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// A directed edge from a gate's output socket to another gate's input slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: GateId,
    pub target: SlotRef,
}

/// A graph of gates and connections, plus the stock of gates left to place.
///
/// Cycles are allowed. Gates and connections are kept in id order, and ids
/// grow monotonically, so iteration order is creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    gates: BTreeMap<GateId, Gate>,
    connections: BTreeMap<ConnectionId, Connection>,
    inventory: Inventory,
    next_gate: u32,
    next_connection: u32,
}

impl Circuit {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            ..Default::default()
        }
    }

    /// An empty circuit with an unlimited inventory.
    pub fn sandbox() -> Self {
        Self::new(Inventory::unlimited())
    }

    pub fn add_gate(&mut self, kind: GateKind, locked: bool) -> Result<GateId, CircuitError> {
        self.add_labeled_gate(kind, None, locked)
    }

    /// Place a gate taken from the inventory.
    pub fn add_labeled_gate(
        &mut self,
        kind: GateKind,
        label: Option<String>,
        locked: bool,
    ) -> Result<GateId, CircuitError> {
        self.check_label(label.as_deref())?;
        let next = self
            .next_gate
            .checked_add(1)
            .ok_or(CircuitError::IdsExhausted)?;
        self.inventory.take(kind)?;
        let id = GateId(self.next_gate);
        self.next_gate = next;
        self.gates.insert(id, Gate::new(id, kind, label, locked));
        tracing::debug!("add gate {id} ({kind})");
        Ok(id)
    }

    /// Place a locked fixture under a caller-chosen id, outside of the
    /// inventory. Used when seeding a puzzle.
    pub fn place_fixture(
        &mut self,
        id: GateId,
        kind: GateKind,
        label: Option<String>,
    ) -> Result<GateId, CircuitError> {
        if self.gates.contains_key(&id) {
            return Err(CircuitError::DuplicateGate(id));
        }
        // The id after the fixture must stay allocatable.
        let next = id.0.checked_add(1).ok_or(CircuitError::IdOutOfRange(id))?;
        self.check_label(label.as_deref())?;
        self.next_gate = self.next_gate.max(next);
        self.gates.insert(id, Gate::new(id, kind, label, true));
        Ok(id)
    }

    /// Labels address gates from outside, so they must be unique.
    fn check_label(&self, label: Option<&str>) -> Result<(), CircuitError> {
        match label {
            Some(label) if self.gate_by_label(label).is_some() => {
                Err(CircuitError::DuplicateLabel(label.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Delete a gate together with every connection touching it, and return
    /// its kind to the inventory.
    pub fn remove_gate(&mut self, id: GateId) -> Result<Gate, CircuitError> {
        let gate = self.gates.get(&id).ok_or(CircuitError::UnknownGate(id))?;
        if gate.locked {
            return Err(CircuitError::GateLocked(id));
        }
        let gate = self.gates.remove(&id).ok_or(CircuitError::UnknownGate(id))?;
        self.connections
            .retain(|_, conn| conn.source != id && conn.target.gate != id);
        self.inventory.restore(gate.kind);
        tracing::debug!("remove gate {id} ({})", gate.kind);
        Ok(gate)
    }

    /// Wire the output socket of `source` into the `target` slot.
    ///
    /// Several connections may feed the same slot. During evaluation the
    /// one created last wins.
    pub fn connect(
        &mut self,
        source: GateId,
        target: SlotRef,
    ) -> Result<ConnectionId, CircuitError> {
        let from = self.gates.get(&source).ok_or(CircuitError::UnknownGate(source))?;
        let to = self
            .gates
            .get(&target.gate)
            .ok_or(CircuitError::UnknownGate(target.gate))?;
        if !from.kind.has_output() {
            return Err(CircuitError::invalid_socket(format!(
                "{source} ({}) has no output socket",
                from.kind
            )));
        }
        if !to.kind.accepts(target.slot) {
            return Err(CircuitError::invalid_socket(format!(
                "{} ({}) has no input slot {}",
                target.gate, to.kind, target.slot
            )));
        }
        if source == target.gate {
            return Err(CircuitError::invalid_socket(format!(
                "{source} cannot feed itself"
            )));
        }

        let next = self
            .next_connection
            .checked_add(1)
            .ok_or(CircuitError::IdsExhausted)?;
        let id = ConnectionId(self.next_connection);
        self.next_connection = next;
        self.connections.insert(id, Connection { id, source, target });
        tracing::debug!("connect {id}: {source} -> {target}");
        Ok(id)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> Result<Connection, CircuitError> {
        let conn = self
            .connections
            .remove(&id)
            .ok_or(CircuitError::UnknownConnection(id))?;
        tracing::debug!("disconnect {id}: {} -> {}", conn.source, conn.target);
        Ok(conn)
    }

    /// Set the held state of a switch.
    pub fn toggle_switch(&mut self, id: GateId, value: bool) -> Result<(), CircuitError> {
        let gate = self.gates.get_mut(&id).ok_or(CircuitError::UnknownGate(id))?;
        if !gate.kind.is_switch() {
            return Err(CircuitError::NotASwitch(id));
        }
        gate.output = value;
        Ok(())
    }

    /// Evaluate and write the result into every gate's displayed state.
    pub fn settle(&mut self, config: &EvalConfig) -> EvaluationSnapshot {
        let snapshot = evaluate(self, config);
        self.apply_snapshot(&snapshot);
        snapshot
    }

    pub fn apply_snapshot(&mut self, snapshot: &EvaluationSnapshot) {
        for gate in self.gates.values_mut() {
            if let Some(output) = snapshot.output(gate.id) {
                gate.output = output;
            }
            if let Some(inputs) = snapshot.inputs(gate.id) {
                gate.inputs = inputs;
            }
        }
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    pub fn gate_by_label(&self, label: &str) -> Option<&Gate> {
        self.gates.values().find(|g| g.label() == Some(label))
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Connections leaving the output socket of `gate`.
    pub fn connections_from(&self, gate: GateId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.source == gate)
    }

    /// Connections feeding `slot`, oldest first.
    pub fn connections_into(&self, slot: SlotRef) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.target == slot)
    }

    pub fn switches(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values().filter(|g| g.kind == GateKind::Switch)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values().filter(|g| g.kind == GateKind::Output)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn count_of_kind(&self, kind: GateKind) -> usize {
        self.gates.values().filter(|g| g.kind == kind).count()
    }

    /// Number of gates the player placed, i.e. every non-locked gate.
    pub fn placed_gate_count(&self) -> usize {
        self.gates.values().filter(|g| !g.locked).count()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn set_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Current switch states, in id order.
    pub fn switch_states(&self) -> Vec<(GateId, bool)> {
        self.switches().map(|g| (g.id, g.output)).collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Slot;

    fn and_circuit() -> (Circuit, [GateId; 4]) {
        let mut c = Circuit::sandbox();
        let a = c.add_gate(GateKind::Switch, true).unwrap();
        let b = c.add_gate(GateKind::Switch, true).unwrap();
        let and = c.add_gate(GateKind::And, false).unwrap();
        let out = c.add_gate(GateKind::Output, true).unwrap();
        c.connect(a, SlotRef::new(and, Slot::In1)).unwrap();
        c.connect(b, SlotRef::new(and, Slot::In2)).unwrap();
        c.connect(and, SlotRef::new(out, Slot::In1)).unwrap();
        (c, [a, b, and, out])
    }

    #[test]
    fn test_inventory_exhausted() {
        let mut c = Circuit::new(Inventory::limited([(GateKind::Not, 1)]));
        let not = c.add_gate(GateKind::Not, false).unwrap();
        assert_eq!(
            c.add_gate(GateKind::Not, false),
            Err(CircuitError::InventoryExhausted(GateKind::Not))
        );
        assert_eq!(
            c.add_gate(GateKind::And, false),
            Err(CircuitError::InventoryExhausted(GateKind::And))
        );
        assert_eq!(c.len(), 1);

        c.remove_gate(not).unwrap();
        assert_eq!(c.inventory().remaining(GateKind::Not), Some(1));
    }

    #[test]
    fn test_remove_gate_drops_connections() {
        let (mut c, [_, _, and, _]) = and_circuit();
        assert_eq!(c.connections().count(), 3);
        let removed = c.remove_gate(and).unwrap();
        assert_eq!(removed.kind(), GateKind::And);
        assert_eq!(c.connections().count(), 0);
        assert!(c.gate(and).is_none());
    }

    #[test]
    fn test_locked_gate_cannot_be_removed() {
        let (mut c, [a, ..]) = and_circuit();
        let before = c.clone();
        assert_eq!(c.remove_gate(a), Err(CircuitError::GateLocked(a)));
        assert_eq!(c, before);
    }

    #[test]
    fn test_connect_validation() {
        let (mut c, [a, b, and, out]) = and_circuit();
        let before = c.clone();

        // Output has no output socket.
        assert!(matches!(
            c.connect(out, SlotRef::new(and, Slot::In1)),
            Err(CircuitError::InvalidSocket { .. })
        ));
        // Switches have no input slots.
        assert!(matches!(
            c.connect(a, SlotRef::new(b, Slot::In1)),
            Err(CircuitError::InvalidSocket { .. })
        ));
        // Output has a single slot.
        assert!(matches!(
            c.connect(and, SlotRef::new(out, Slot::In2)),
            Err(CircuitError::InvalidSocket { .. })
        ));
        // No self loops.
        assert!(matches!(
            c.connect(and, SlotRef::new(and, Slot::In1)),
            Err(CircuitError::InvalidSocket { .. })
        ));
        assert_eq!(
            c.connect(GateId(99), SlotRef::new(and, Slot::In1)),
            Err(CircuitError::UnknownGate(GateId(99)))
        );
        assert_eq!(c, before);
    }

    #[test]
    fn test_disconnect() {
        let (mut c, [a, _, and, _]) = and_circuit();
        let id = c.connections_from(a).next().unwrap().id;
        let conn = c.disconnect(id).unwrap();
        assert_eq!(conn.target, SlotRef::new(and, Slot::In1));
        assert_eq!(c.disconnect(id), Err(CircuitError::UnknownConnection(id)));
    }

    #[test]
    fn test_toggle_switch() {
        let (mut c, [a, _, and, _]) = and_circuit();
        c.toggle_switch(a, true).unwrap();
        assert!(c.gate(a).unwrap().output());
        assert_eq!(c.toggle_switch(and, true), Err(CircuitError::NotASwitch(and)));
    }

    #[test]
    fn test_fixture_ids() {
        let mut c = Circuit::new(Inventory::Limited(Default::default()));
        c.place_fixture(GateId(5), GateKind::Switch, Some("A".into()))
            .unwrap();
        assert_eq!(
            c.place_fixture(GateId(5), GateKind::Output, None),
            Err(CircuitError::DuplicateGate(GateId(5)))
        );
        assert_eq!(c.gate_by_label("A").unwrap().id(), GateId(5));
        assert!(c.gate(GateId(5)).unwrap().is_locked());
        assert_eq!(c.placed_gate_count(), 0);

        c.set_inventory(Inventory::unlimited());
        assert_eq!(c.add_gate(GateKind::Or, false).unwrap(), GateId(6));
    }

    #[test]
    fn test_fixture_id_at_upper_bound() {
        let mut c = Circuit::new(Inventory::limited([(GateKind::Not, 1)]));
        assert_eq!(
            c.place_fixture(GateId(u32::MAX), GateKind::Switch, None),
            Err(CircuitError::IdOutOfRange(GateId(u32::MAX)))
        );
        assert!(c.is_empty());

        // The last allocatable id is taken by the fixture itself.
        let last = GateId(u32::MAX - 1);
        c.place_fixture(last, GateKind::Switch, None).unwrap();
        assert_eq!(
            c.add_gate(GateKind::Not, false),
            Err(CircuitError::IdsExhausted)
        );
        assert_eq!(c.inventory().remaining(GateKind::Not), Some(1));
        assert_eq!(c.gate(last).unwrap().kind(), GateKind::Switch);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_labels_are_unique() {
        let mut c = Circuit::new(Inventory::limited([(GateKind::Xor, 2)]));
        c.place_fixture(GateId(0), GateKind::Switch, Some("A".into()))
            .unwrap();
        assert_eq!(
            c.place_fixture(GateId(1), GateKind::Switch, Some("A".into())),
            Err(CircuitError::DuplicateLabel("A".to_string()))
        );
        assert_eq!(
            c.add_labeled_gate(GateKind::Xor, Some("A".into()), false),
            Err(CircuitError::DuplicateLabel("A".to_string()))
        );
        assert_eq!(c.inventory().remaining(GateKind::Xor), Some(2));

        let x = c
            .add_labeled_gate(GateKind::Xor, Some("X".into()), false)
            .unwrap();
        c.remove_gate(x).unwrap();
        // A removed gate frees its label.
        c.add_labeled_gate(GateKind::Xor, Some("X".into()), false)
            .unwrap();
        assert_eq!(c.len(), 2);
    }
}
