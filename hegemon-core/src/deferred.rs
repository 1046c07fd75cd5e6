//! Deferred side effects.
//!
//! Geometry recomputation and other long-running follow-ups are never
//! untracked background tasks: an operation enqueues an explicit effect and
//! the orchestrator drains the queue at the start of the next tick. The
//! design tolerates completions landing after the tick that issued them —
//! "war declared" and "territory conquest applied" are separate write
//! phases.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::geometry::ConquestPlan;
use crate::state::Code;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferredEffect {
    /// Ask the geometry service for a conquest area and transfer it.
    ApplyConquest {
        winner: Code,
        loser: Code,
        decisiveness: f64,
        plan: Option<ConquestPlan>,
        location: Option<(f64, f64)>,
    },
    /// Fold an annexed nation's territory into the annexer's region.
    MergeAnnexedTerritory { annexer: Code, annexed: Code },
    /// Carve a liberated nation back out of its occupier's region.
    RestoreTerritory { liberated: Code, from: Code },
}

/// FIFO queue of effects, drained deterministically once per tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkQueue {
    queue: VecDeque<DeferredEffect>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: DeferredEffect) {
        self.queue.push_back(effect);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued effect, leaving the queue empty. Effects enqueued
    /// while draining run next tick, not this one.
    pub fn take_all(&mut self) -> Vec<DeferredEffect> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = WorkQueue::new();
        q.push(DeferredEffect::MergeAnnexedTerritory {
            annexer: "A".into(),
            annexed: "B".into(),
        });
        q.push(DeferredEffect::RestoreTerritory {
            liberated: "B".into(),
            from: "A".into(),
        });

        let drained = q.take_all();
        assert_eq!(drained.len(), 2);
        assert!(q.is_empty());
        assert!(matches!(
            drained[0],
            DeferredEffect::MergeAnnexedTerritory { .. }
        ));
    }
}
