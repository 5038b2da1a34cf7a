use gate_sim::{
    evaluate, Circuit, CircuitError, EvalConfig, GateId, GateKind, Inventory, Relaxation, Slot,
    SlotRef,
};
use proptest::{prelude::*, sample::select};
use strum::IntoEnumIterator;

fn kinds() -> impl Strategy<Value = Vec<GateKind>> {
    prop::collection::vec(select(GateKind::iter().collect::<Vec<_>>()), 1..12)
}

fn wires() -> impl Strategy<Value = Vec<(usize, usize, bool)>> {
    prop::collection::vec((any::<usize>(), any::<usize>(), any::<bool>()), 0..32)
}

/// Build an arbitrary, possibly cyclic, circuit. Invalid wiring attempts are
/// rejected by `connect` and simply skipped.
fn build(kinds: &[GateKind], wires: &[(usize, usize, bool)], switches: &[bool]) -> Circuit {
    let mut c = Circuit::sandbox();
    let ids = kinds
        .iter()
        .map(|&k| c.add_gate(k, false).unwrap())
        .collect::<Vec<_>>();
    for &(from, to, second) in wires {
        let slot = if second { Slot::In2 } else { Slot::In1 };
        let _ = c.connect(
            ids[from % ids.len()],
            SlotRef::new(ids[to % ids.len()], slot),
        );
    }
    let switch_ids = c.switches().map(|g| g.id()).collect::<Vec<_>>();
    for (id, &v) in switch_ids.into_iter().zip(switches) {
        c.toggle_switch(id, v).unwrap();
    }
    c
}

proptest! {
    #[test]
    fn test_evaluate_is_deterministic(
        kinds in kinds(),
        wires in wires(),
        switches in prop::collection::vec(any::<bool>(), 12),
    ) {
        let mut c = build(&kinds, &wires, &switches);
        let config = EvalConfig::default();
        let first = evaluate(&c, &config);
        prop_assert_eq!(&first, &evaluate(&c, &config));

        // Settling writes displayed state but does not feed back into evaluation.
        c.settle(&config);
        prop_assert_eq!(&first, &evaluate(&c, &config));
    }

    #[test]
    fn test_fixed_point_is_stable(
        kinds in kinds(),
        wires in wires(),
        switches in prop::collection::vec(any::<bool>(), 12),
    ) {
        let c = build(&kinds, &wires, &switches);
        let mut relax = Relaxation::new(&c);
        let mut settled = false;
        for _ in 0..64 {
            if !relax.pass() {
                settled = true;
                break;
            }
        }
        if settled {
            let fixed = relax.outputs().clone();
            prop_assert!(!relax.pass());
            prop_assert_eq!(&fixed, relax.outputs());
        }
    }

    #[test]
    fn test_evaluation_terminates(kinds in kinds(), wires in wires()) {
        let c = build(&kinds, &wires, &[]);
        let config = EvalConfig { max_iterations: 7 };
        let snapshot = evaluate(&c, &config);
        prop_assert!(snapshot.passes() <= 7);
        prop_assert_eq!(snapshot.outputs().count(), c.len());
    }

    #[test]
    fn test_inventory_conservation(
        ops in prop::collection::vec(
            (any::<bool>(), select(GateKind::iter().collect::<Vec<_>>()), 0u32..16),
            0..64,
        ),
    ) {
        let stock = GateKind::iter().map(|k| (k, 2)).collect::<Vec<_>>();
        let mut c = Circuit::new(Inventory::limited(stock));
        c.place_fixture(GateId(0), GateKind::Switch, None).unwrap();
        let total = |c: &Circuit, k: GateKind| {
            c.inventory().remaining(k).unwrap() as usize + c.count_of_kind(k)
        };
        let before = GateKind::iter().map(|k| total(&c, k)).collect::<Vec<_>>();

        for (add, kind, idx) in ops {
            if add {
                match c.add_gate(kind, false) {
                    Ok(_) | Err(CircuitError::InventoryExhausted(_)) => {}
                    Err(e) => prop_assert!(false, "unexpected error {e}"),
                }
            } else {
                let _ = c.remove_gate(GateId(idx));
            }
            let now = GateKind::iter().map(|k| total(&c, k)).collect::<Vec<_>>();
            prop_assert_eq!(&before, &now);
        }
        prop_assert!(c.gate(GateId(0)).is_some());
    }
}
