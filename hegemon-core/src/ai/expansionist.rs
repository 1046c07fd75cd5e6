//! Expansionists grow or die. They keep a standing target list of weak
//! neighbors and queue wars and territorial demands whenever the balance of
//! power allows.

use rand::rngs::StdRng;
use rand::Rng;

use crate::ai::{
    weakest_rival, ActionKind, Assessment, Focus, Personality, QueuedAction, Strategy,
    ThreatAssessment,
};
use crate::power::coalition_strength;
use crate::state::WorldState;

pub struct Expansionist;

impl Strategy for Expansionist {
    fn personality(&self) -> Personality {
        Personality::Expansionist
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        rng: &mut StdRng,
    ) -> Assessment {
        let mut actions = Vec::new();

        // Under real pressure even an expansionist digs in.
        if threat.level > 3.0 {
            return Assessment {
                focus: Focus::Consolidate,
                actions: vec![QueuedAction::new(ActionKind::BuildMilitary, None)],
            };
        }

        if let Some(target) = weakest_rival(state, code) {
            let own = coalition_strength(state, code) as f64;
            let theirs = coalition_strength(state, &target).max(1) as f64;

            if own / theirs > 1.2 && !state.are_at_war(code, &target) {
                actions.push(QueuedAction::new(ActionKind::DeclareWar, Some(&target)));
                if rng.gen::<f64>() < 0.5 {
                    actions.push(QueuedAction::new(ActionKind::DemandTerritory, Some(&target)));
                }
            } else {
                actions.push(QueuedAction::new(ActionKind::BuildMilitary, None));
            }
        } else {
            actions.push(QueuedAction::new(ActionKind::BuildMilitary, None));
        }

        Assessment {
            focus: Focus::Expand,
            actions,
        }
    }
}
