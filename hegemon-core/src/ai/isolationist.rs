//! Isolationists sit out the great game. They act rarely, arm only when
//! genuinely threatened, and never seek entanglements.

use rand::rngs::StdRng;
use rand::Rng;

use crate::ai::{
    worst_standing, ActionKind, Assessment, Focus, Personality, QueuedAction, Strategy,
    ThreatAssessment,
};
use crate::state::WorldState;

pub struct Isolationist;

impl Strategy for Isolationist {
    fn personality(&self) -> Personality {
        Personality::Isolationist
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        rng: &mut StdRng,
    ) -> Assessment {
        if threat.level > 2.0 {
            return Assessment {
                focus: Focus::Consolidate,
                actions: vec![QueuedAction::new(ActionKind::BuildMilitary, None)],
            };
        }

        // Most ticks: do nothing at all.
        if rng.gen::<f64>() < 0.8 {
            return Assessment {
                focus: Focus::Consolidate,
                actions: Vec::new(),
            };
        }

        let mut actions = Vec::new();
        if let Some(rival) = worst_standing(state, code) {
            if state.standing(code, &rival) < -20 {
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
    fn test_mostly_idle() {
        let state = WorldStateBuilder::new()
            .with_nation("ISO")
            .with_nation("AAA")
            .build();

        let mut rng = StdRng::seed_from_u64(10);
        let mut idle_ticks = 0;
        for _ in 0..100 {
            let assessment =
                Isolationist.assess("ISO", &state, &ThreatAssessment::default(), &mut rng);
            if assessment.actions.is_empty() {
                idle_ticks += 1;
            }
            assert!(assessment
                .actions
                .iter()
                .all(|a| a.kind != ActionKind::DeclareWar));
        }
        assert!(idle_ticks > 60);
    }

    #[test]
    fn test_arms_only_when_threatened() {
        let state = WorldStateBuilder::new()
            .with_nation("ISO")
            .with_nation("BIG")
            .build();

        let threat = ThreatAssessment {
            level: 4.0,
            principal: Some("BIG".into()),
        };
        let mut rng = StdRng::seed_from_u64(10);
        let assessment = Isolationist.assess("ISO", &state, &threat, &mut rng);
        assert_eq!(assessment.actions[0].kind, ActionKind::BuildMilitary);
    }
}
