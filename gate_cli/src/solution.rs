use anyhow::{Context, Result};
use gate_puzzle::Session;
use gate_sim::{GateId, GateKind, Slot, SlotRef};
use serde::Deserialize;

fn default_slot() -> Slot {
    Slot::In1
}

/// One recorded edit. Gates are addressed by label so that a solution does
/// not depend on the ids the session hands out.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Move {
    Add {
        kind: GateKind,
        label: String,
    },
    Remove {
        label: String,
    },
    Connect {
        from: String,
        to: String,
        #[serde(default = "default_slot")]
        slot: Slot,
    },
    Disconnect {
        from: String,
        to: String,
        #[serde(default = "default_slot")]
        slot: Slot,
    },
    Toggle {
        label: String,
        value: bool,
    },
}

/// A replayable sequence of edits, as saved by a player.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Solution {
    pub moves: Vec<Move>,
    /// Time the player took. Scored against the wall clock when absent.
    #[serde(default)]
    pub elapsed_seconds: Option<u64>,
}

fn resolve(session: &Session, label: &str) -> Result<GateId> {
    session
        .circuit()
        .gate_by_label(label)
        .map(|g| g.id())
        .with_context(|| format!("no gate labeled {label:?}"))
}

impl Move {
    pub fn apply(&self, session: &mut Session) -> Result<()> {
        match self {
            Move::Add { kind, label } => {
                session.add_labeled_gate(*kind, label.clone())?;
            }
            Move::Remove { label } => {
                let id = resolve(session, label)?;
                session.remove_gate(id)?;
            }
            Move::Connect { from, to, slot } => {
                let source = resolve(session, from)?;
                let target = SlotRef::new(resolve(session, to)?, *slot);
                session.connect(source, target)?;
            }
            Move::Disconnect { from, to, slot } => {
                let source = resolve(session, from)?;
                let target = SlotRef::new(resolve(session, to)?, *slot);
                let id = session
                    .circuit()
                    .connections_into(target)
                    .find(|c| c.source == source)
                    .map(|c| c.id)
                    .with_context(|| format!("{from} is not wired into {to}.{slot}"))?;
                session.disconnect(id)?;
            }
            Move::Toggle { label, value } => {
                let id = resolve(session, label)?;
                session.toggle_switch(id, *value)?;
            }
        }
        Ok(())
    }
}

impl Solution {
    pub fn replay(&self, session: &mut Session) -> Result<()> {
        for (i, m) in self.moves.iter().enumerate() {
            tracing::debug!("move {i}: {m:?}");
            m.apply(session)
                .with_context(|| format!("could not apply move {i} ({m:?})"))?;
        }
        Ok(())
    }
}
