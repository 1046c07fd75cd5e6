//! Ideologues sort the world into believers and heretics. Aligned nations
//! get alliances; the far side of the spectrum gets sanctions and, when the
//! gap is wide and the odds are good, war.

use rand::rngs::StdRng;

use crate::ai::{
    ideological_rival, ActionKind, Assessment, Focus, Personality, QueuedAction, Strategy,
    ThreatAssessment,
};
use crate::power::coalition_strength;
use crate::registry::actionable;
use crate::state::{Code, WorldState};

pub struct Ideological;

/// Closest fellow traveler not yet an ally.
fn aligned_friend(state: &WorldState, code: &str) -> Option<Code> {
    let own = state.nations.get(code)?.politics.ideology.get();
    let allies = state
        .nations
        .get(code)
        .map(|n| n.allies.clone())
        .unwrap_or_default();
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .filter(|c| !allies.contains(c))
        .map(|c| {
            let gap = (state.nations[&c].politics.ideology.get() - own).abs();
            (c, gap)
        })
        .filter(|(_, gap)| *gap <= 20)
        .min_by_key(|(_, gap)| *gap)
        .map(|(c, _)| c)
}

impl Strategy for Ideological {
    fn personality(&self) -> Personality {
        Personality::Ideological
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        _rng: &mut StdRng,
    ) -> Assessment {
        let mut actions = Vec::new();

        if let Some(heretic) = ideological_rival(state, code) {
            let own = coalition_strength(state, code) as f64;
            let theirs = coalition_strength(state, &heretic).max(1) as f64;
            if own / theirs > 1.3 && !state.are_at_war(code, &heretic) {
                actions.push(QueuedAction::new(ActionKind::DeclareWar, Some(&heretic)));
            } else {
                actions.push(QueuedAction::new(ActionKind::Sanction, Some(&heretic)));
            }
        }

        if let Some(friend) = aligned_friend(state, code) {
            actions.push(QueuedAction::new(ActionKind::ProposeAlliance, Some(&friend)));
        }

        if threat.level > 3.0 {
            actions.truncate(1);
            actions.push(QueuedAction::new(ActionKind::BuildMilitary, None));
        }

        Assessment {
            focus: if actions
                .iter()
                .any(|a| a.kind == ActionKind::DeclareWar)
            {
                Focus::Expand
            } else {
                Focus::Ally
            },
            actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;
    use rand::SeedableRng;

    #[test]
    fn test_sanctions_the_far_side() {
        let mut state = WorldStateBuilder::new()
            .with_nation("IDE")
            .with_nation("OPP")
            .build();
        state.nation_mut("IDE").unwrap().politics.ideology.set(-80);
        state.nation_mut("OPP").unwrap().politics.ideology.set(70);
        state.nation_mut("OPP").unwrap().soldiers = 500_000;

        let mut rng = StdRng::seed_from_u64(1);
        let assessment =
            Ideological.assess("IDE", &state, &ThreatAssessment::default(), &mut rng);

        // Outgunned: sanctions instead of war.
        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::Sanction && a.target.as_deref() == Some("OPP")));
    }

    #[test]
    fn test_allies_with_fellow_travelers() {
        let mut state = WorldStateBuilder::new()
            .with_nation("IDE")
            .with_nation("PAL")
            .build();
        state.nation_mut("IDE").unwrap().politics.ideology.set(50);
        state.nation_mut("PAL").unwrap().politics.ideology.set(45);

        let mut rng = StdRng::seed_from_u64(1);
        let assessment =
            Ideological.assess("IDE", &state, &ThreatAssessment::default(), &mut rng);

        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::ProposeAlliance && a.target.as_deref() == Some("PAL")));
    }
}
