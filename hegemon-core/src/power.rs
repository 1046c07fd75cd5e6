//! Composite national power scoring.
//!
//! Pure arithmetic over military/economic/diplomatic/stability/technology
//! inputs; no state access, callable at any rate. Every other component
//! consumes these scores.

use crate::state::{CoalitionKind, WorldState};

/// Component weights. Must sum to 1.0.
const W_MILITARY: f64 = 0.25;
const W_ECONOMY: f64 = 0.25;
const W_DIPLOMACY: f64 = 0.20;
const W_STABILITY: f64 = 0.15;
const W_TECHNOLOGY: f64 = 0.15;

/// Inputs to the composite score.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerInputs {
    pub soldiers: u32,
    /// Troop quality multiplier; 1.0 for a standing army at par.
    pub quality: f64,
    /// 0-100 index for AI nations.
    pub economy: f64,
    /// Absolute budget; used instead of `economy` when `is_player` is set.
    pub budget: i64,
    pub is_player: bool,
    pub unrest: i32,
    pub allies: usize,
    pub coalitions: usize,
    pub agreements: usize,
    pub research_level: u32,
    pub buildings: u32,
}

/// Deterministic composite strength score, rounded to the nearest integer.
pub fn composite_power(inputs: &PowerInputs) -> i32 {
    let quality = if inputs.quality > 0.0 {
        inputs.quality
    } else {
        1.0
    };
    let military = (inputs.soldiers as f64 / 1000.0).min(200.0) * quality;

    let economy = if inputs.is_player {
        (inputs.budget as f64 / 100_000.0).min(200.0)
    } else {
        inputs.economy.min(200.0)
    };

    let diplomacy = (10.0 * inputs.allies as f64
        + 15.0 * inputs.coalitions as f64
        + 5.0 * inputs.agreements as f64)
        .min(100.0);

    let stability = (100 - inputs.unrest) as f64;

    let technology =
        ((inputs.research_level.min(60) as f64) + (5.0 * inputs.buildings as f64).min(40.0)).min(100.0);

    let total = W_MILITARY * military
        + W_ECONOMY * economy
        + W_DIPLOMACY * diplomacy
        + W_STABILITY * stability
        + W_TECHNOLOGY * technology;

    total.round() as i32
}

/// Score a registered nation, gathering inputs from the world state and
/// applying any standing power penalty (covert damage).
pub fn nation_power(state: &WorldState, code: &str) -> i32 {
    let nation = match state.nations.get(code) {
        Some(n) => n,
        None => return 0,
    };

    let coalitions = state
        .coalitions
        .values()
        .filter(|c| c.is_member(code))
        .count();

    let inputs = PowerInputs {
        soldiers: nation.soldiers,
        quality: 1.0,
        economy: nation.economy.get() as f64,
        budget: nation.budget,
        is_player: nation.is_player,
        unrest: nation.politics.unrest.get(),
        allies: nation.allies.len(),
        coalitions,
        agreements: nation.agreements.len(),
        research_level: nation.research_level,
        buildings: nation.buildings,
    };

    (composite_power(&inputs) as f64 * nation.power_penalty).round() as i32
}

/// Effective military weight of a nation plus its military-coalition
/// partners. The AI uses this as the deterrence baseline.
pub fn coalition_strength(state: &WorldState, code: &str) -> u64 {
    let own = state
        .nations
        .get(code)
        .map(|n| n.soldiers as u64)
        .unwrap_or(0);

    let partners: u64 = state
        .coalitions
        .values()
        .filter(|c| c.kind == CoalitionKind::Military && c.is_member(code))
        .flat_map(|c| c.members.iter())
        .filter(|m| m.as_str() != code)
        .filter_map(|m| state.nations.get(m))
        .filter(|n| !n.is_annexed)
        .map(|n| n.soldiers as u64)
        .sum();

    own + partners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_military_caps_at_200() {
        let a = composite_power(&PowerInputs {
            soldiers: 200_000,
            quality: 1.0,
            ..Default::default()
        });
        let b = composite_power(&PowerInputs {
            soldiers: 5_000_000,
            quality: 1.0,
            ..Default::default()
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_player_budget_economy() {
        let player = composite_power(&PowerInputs {
            budget: 10_000_000,
            is_player: true,
            ..Default::default()
        });
        // 10M / 100k = 100 economy points -> 0.25 * 100 + stability term
        let npc = composite_power(&PowerInputs {
            economy: 100.0,
            ..Default::default()
        });
        assert_eq!(player, npc);
    }

    #[test]
    fn test_canonical_example() {
        // 50k soldiers, economy 60, no diplomacy, unrest 20, research 30, 4 buildings
        let score = composite_power(&PowerInputs {
            soldiers: 50_000,
            quality: 1.0,
            economy: 60.0,
            unrest: 20,
            research_level: 30,
            buildings: 4,
            ..Default::default()
        });
        // mil 50*0.25 + eco 60*0.25 + dip 0 + stab 80*0.15 + tech 50*0.15
        assert_eq!(score, (12.5f64 + 15.0 + 0.0 + 12.0 + 7.5).round() as i32);
    }

    #[test]
    fn test_diplomacy_caps_at_100() {
        let score = composite_power(&PowerInputs {
            allies: 20,
            coalitions: 10,
            agreements: 50,
            unrest: 100, // zero out stability
            ..Default::default()
        });
        assert_eq!(score, (0.20f64 * 100.0).round() as i32);
    }

    #[test]
    fn test_unknown_nation_scores_zero() {
        let state = WorldState::default();
        assert_eq!(nation_power(&state, "XYZ"), 0);
    }
}
