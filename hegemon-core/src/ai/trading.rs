//! Trading powers fight with tariffs, not tanks.

use rand::rngs::StdRng;

use crate::ai::{
    best_trade_prospect, worst_standing, ActionKind, Assessment, Focus, Personality, QueuedAction,
    Strategy, ThreatAssessment,
};
use crate::state::WorldState;

pub struct TradingPower;

impl Strategy for TradingPower {
    fn personality(&self) -> Personality {
        Personality::TradingPower
    }

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        _rng: &mut StdRng,
    ) -> Assessment {
        let mut actions = Vec::new();

        if let Some(partner) = best_trade_prospect(state, code) {
            actions.push(QueuedAction::new(ActionKind::TradeAgreement, Some(&partner)));
        }

        // An embargo is the heaviest weapon in the arsenal.
        if let Some(rival) = worst_standing(state, code) {
            if state.standing(code, &rival) < -40 {
                actions.push(QueuedAction::new(ActionKind::Sanction, Some(&rival)));
            } else if state.standing(code, &rival) < 0 {
                actions.push(QueuedAction::new(ActionKind::ImproveRelations, Some(&rival)));
            }
        }

        if threat.level > 3.0 {
            actions.insert(0, QueuedAction::new(ActionKind::BuildMilitary, None));
        }

        Assessment {
            focus: Focus::Ally,
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
    fn test_courts_the_richest_market() {
        let mut state = WorldStateBuilder::new()
            .with_nation("TRD")
            .with_nation("RICH")
            .with_nation("POOR")
            .build();
        state.nation_mut("RICH").unwrap().economy.set(90);
        state.nation_mut("POOR").unwrap().economy.set(10);

        let mut rng = StdRng::seed_from_u64(1);
        let assessment =
            TradingPower.assess("TRD", &state, &ThreatAssessment::default(), &mut rng);

        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::TradeAgreement && a.target.as_deref() == Some("RICH")));
    }

    #[test]
    fn test_embargoes_enemies() {
        let mut state = WorldStateBuilder::new()
            .with_nation("TRD")
            .with_nation("FOE")
            .build();
        state.diplomacy.set_tie("TRD", "FOE", -60);

        let mut rng = StdRng::seed_from_u64(1);
        let assessment =
            TradingPower.assess("TRD", &state, &ThreatAssessment::default(), &mut rng);

        assert!(assessment
            .actions
            .iter()
            .any(|a| a.kind == ActionKind::Sanction && a.target.as_deref() == Some("FOE")));
    }
}
