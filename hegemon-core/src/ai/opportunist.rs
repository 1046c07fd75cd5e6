//! Opportunists wait for someone else to bloody the target first. They move
//! on nations already at war, destabilized, or carved up, and trade
//! politely with everyone else in the meantime.

use rand::rngs::StdRng;

use crate::ai::{
    best_trade_prospect, ActionKind, Assessment, Focus, Personality, QueuedAction, Strategy,
    ThreatAssessment,
};
use crate::registry::actionable;
use crate::state::{Code, Modifier, WorldState};

pub struct Opportunist;

/// A target is "wounded" when it is already fighting someone else, has been
/// destabilized, or has bled territory.
fn wounded_target(state: &WorldState, code: &str) -> Option<Code> {
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .filter(|c| !state.share_coalition(code, c))
        .filter(|c| !state.are_at_war(code, c))
        .filter(|c| {
            let n = &state.nations[c];
            n.is_at_war()
                || n.modifiers.contains(Modifier::Destabilized)
                || n.territory_lost.get() > 15
        })
        .min_by_key(|c| state.nations[c].power)
}

impl Strategy for Opportunist {
    fn personality(&self) -> Personality {
        Personality::Opportunist
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        _rng: &mut StdRng,
    ) -> Assessment {
        if threat.level > 4.0 {
            return Assessment {
                focus: Focus::Consolidate,
                actions: vec![QueuedAction::new(ActionKind::BuildMilitary, None)],
            };
        }

        if let Some(target) = wounded_target(state, code) {
            return Assessment {
                focus: Focus::Expand,
                actions: vec![
                    QueuedAction::new(ActionKind::DeclareWar, Some(&target)),
                    QueuedAction::new(ActionKind::DemandTerritory, Some(&target)),
                ],
            };
        }

        let mut actions = Vec::new();
        if let Some(partner) = best_trade_prospect(state, code) {
            actions.push(QueuedAction::new(ActionKind::TradeAgreement, Some(&partner)));
        }
        Assessment {
            focus: Focus::Consolidate,
            actions,
        }
    }
}
