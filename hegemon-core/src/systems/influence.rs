//! Soft-power influence actions.
//!
//! Non-military instruments trading an abstract influence-point currency
//! for relational or military effects on a target nation. Influence income
//! accrues monthly; an actor without the points gets a failure and no
//! mutation.

use crate::config::SimConfig;
use crate::events::EventKind;
use crate::input::InfluenceAction;
use crate::registry::{actionable, adjust_standing};
use crate::state::WorldState;
use crate::step::CommandError;

pub fn action_cost(action: InfluenceAction, config: &SimConfig) -> i32 {
    match action {
        InfluenceAction::CulturalExchange => config.cultural_exchange_cost,
        InfluenceAction::EconomicAid => config.economic_aid_cost,
        InfluenceAction::Espionage => config.espionage_cost,
        InfluenceAction::BroadcastPropaganda => config.broadcast_cost,
    }
}

/// Execute a soft-power action. `Ok(false)` is the silent no-op path for
/// missing or annexed parties.
pub fn execute_influence(
    state: &mut WorldState,
    actor: &str,
    target: &str,
    action: InfluenceAction,
    config: &SimConfig,
) -> Result<bool, CommandError> {
    if actor == target || !actionable(state, actor) || !actionable(state, target) {
        return Ok(false);
    }

    let cost = action_cost(action, config);
    let available = state
        .nations
        .get(actor)
        .map(|n| n.influence)
        .unwrap_or(0);
    if available < cost {
        return Err(CommandError::InsufficientInfluence {
            required: cost,
            available,
        });
    }
    if let Some(nation) = state.nations.get_mut(actor) {
        nation.influence -= cost;
    }

    match action {
        InfluenceAction::CulturalExchange => {
            adjust_standing(state, actor, target, 10);
        }
        InfluenceAction::EconomicAid => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.economy.add(5);
            }
            adjust_standing(state, actor, target, 15);
        }
        InfluenceAction::Espionage => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.soldiers = (nation.soldiers as f64 * 0.95).round() as u32;
            }
            adjust_standing(state, actor, target, -15);
        }
        InfluenceAction::BroadcastPropaganda => {
            adjust_standing(state, actor, target, 8);
        }
    }

    let target_name = state
        .nations
        .get(target)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| target.to_string());
    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::InfluenceAction,
        1,
        format!("Influence campaign toward {target_name}"),
        String::new(),
        vec![actor.to_string(), target.to_string()],
        date,
        tick,
    );

    Ok(true)
}

/// Monthly influence income for every living nation.
pub fn run_influence_tick(state: &mut WorldState, config: &SimConfig) {
    for nation in state.nations.values_mut() {
        if !nation.is_annexed {
            nation.influence += config.influence_income;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_aid_improves_economy_and_standing() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .player("PLR")
            .with_nation("AAA")
            .build();
        state.nation_mut("PLR").unwrap().influence = 100;

        execute_influence(
            &mut state,
            "PLR",
            "AAA",
            InfluenceAction::EconomicAid,
            &config,
        )
        .unwrap();

        let nation = state.nation("AAA").unwrap();
        assert_eq!(nation.economy.get(), 55);
        assert_eq!(nation.relations.get(), 15);
        assert_eq!(
            state.nation("PLR").unwrap().influence,
            100 - config.economic_aid_cost
        );
    }

    #[test]
    fn test_insufficient_influence_fails_without_mutation() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .player("PLR")
            .with_nation("AAA")
            .build();
        state.nation_mut("PLR").unwrap().influence = 1;

        let err = execute_influence(
            &mut state,
            "PLR",
            "AAA",
            InfluenceAction::Espionage,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InsufficientInfluence { .. }));
        assert_eq!(state.nation("AAA").unwrap().relations.get(), 0);
    }

    #[test]
    fn test_income_accrues_to_living_nations() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        crate::registry::annex(&mut state, "BBB", None);

        run_influence_tick(&mut state, &config);
        assert_eq!(
            state.nation("AAA").unwrap().influence,
            config.influence_income
        );
        assert_eq!(state.nation("BBB").unwrap().influence, 0);
    }
}
