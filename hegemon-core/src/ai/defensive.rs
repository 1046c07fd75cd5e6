//! Defensive nations arm against the threat of the day and buy friends.

use rand::rngs::StdRng;

use crate::ai::{
    best_standing_non_ally, worst_standing, ActionKind, Assessment, Focus, Personality,
    QueuedAction, Strategy, ThreatAssessment,
};
use crate::state::WorldState;

pub struct Defensive;

impl Strategy for Defensive {
    fn personality(&self) -> Personality {
        Personality::Defensive
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        _rng: &mut StdRng,
    ) -> Assessment {
        let mut actions = Vec::new();

        if threat.level > 1.5 {
            actions.push(QueuedAction::new(ActionKind::BuildMilitary, None));
            if let Some(friend) = best_standing_non_ally(state, code) {
                actions.push(QueuedAction::new(ActionKind::ProposeAlliance, Some(&friend)));
            }
            return Assessment {
                focus: Focus::Ally,
                actions,
            };
        }

        // Quiet times: mend the worst fence.
        if let Some(rival) = worst_standing(state, code) {
            if state.standing(code, &rival) < 0 {
                actions.push(QueuedAction::new(ActionKind::ImproveRelations, Some(&rival)));
            }
        }
        Assessment {
            focus: Focus::Consolidate,
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
    fn test_arms_and_allies_under_threat() {
        let mut state = WorldStateBuilder::new()
            .with_nation("DEF")
            .with_nation("BIG")
            .with_nation("PAL")
            .build();
        state.diplomacy.set_tie("DEF", "PAL", 80);

        let threat = ThreatAssessment {
            level: 3.0,
            principal: Some("BIG".into()),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let assessment = Defensive.assess("DEF", &state, &threat, &mut rng);

        assert_eq!(assessment.focus, Focus::Ally);
        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::BuildMilitary));
        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::ProposeAlliance && a.target.as_deref() == Some("PAL")));
    }

    #[test]
    fn test_mends_fences_in_peacetime() {
        let mut state = WorldStateBuilder::new()
            .with_nation("DEF")
            .with_nation("SOUR")
            .build();
        state.diplomacy.set_tie("DEF", "SOUR", -40);

        let mut rng = StdRng::seed_from_u64(1);
        let assessment =
            Defensive.assess("DEF", &state, &ThreatAssessment::default(), &mut rng);

        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::ImproveRelations && a.target.as_deref() == Some("SOUR")));
    }
}
