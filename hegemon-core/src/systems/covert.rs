//! Covert operations.
//!
//! Each operation trades a fixed budget cost for a state change on the
//! target plus a standing penalty when the hand is caught. An actor without
//! the budget gets a failure and a message, and no state mutation occurs.

use rand::Rng;

use crate::config::SimConfig;
use crate::events::EventKind;
use crate::input::CovertOp;
use crate::registry::{actionable, adjust_standing};
use crate::state::{Modifier, WorldState};
use crate::step::CommandError;

/// Standing penalty when a destabilization campaign is exposed.
const DESTABILIZE_PENALTY: i32 = -40;
/// Standing penalty for funding separatists.
const SEPARATIST_PENALTY: i32 = -30;
/// Relations gained from a successful propaganda plant.
const PROPAGANDA_BONUS: i32 = 15;

/// Budget cost of an operation.
pub fn op_cost(op: CovertOp, config: &SimConfig) -> i64 {
    match op {
        CovertOp::Destabilize => config.destabilize_cost,
        CovertOp::FundSeparatists => config.fund_separatists_cost,
        CovertOp::PlantPropaganda => config.propaganda_cost,
    }
}

/// Execute a covert operation against a target nation.
///
/// Returns `Ok(false)` as a silent no-op when either party is missing or
/// the target is annexed; `Err` when the actor cannot pay.
pub fn execute_covert(
    state: &mut WorldState,
    actor: &str,
    target: &str,
    op: CovertOp,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<bool, CommandError> {
    if actor == target || !actionable(state, actor) || !actionable(state, target) {
        return Ok(false);
    }

    let cost = op_cost(op, config);
    charge_budget(state, actor, cost)?;

    match op {
        CovertOp::Destabilize => {
            let cut = rng.gen_range(0.15..0.25);
            if let Some(nation) = state.nations.get_mut(target) {
                nation.soldiers = (nation.soldiers as f64 * (1.0 - cut)).round() as u32;
                nation.modifiers.insert(Modifier::Destabilized);
                nation.politics.unrest.add(15);
            }
            adjust_standing(state, actor, target, DESTABILIZE_PENALTY);
        }
        CovertOp::FundSeparatists => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.power_penalty = (nation.power_penalty * 0.8).max(0.2);
                nation.modifiers.insert(Modifier::SeparatistUnrest);
                nation.politics.unrest.add(20);
            }
            adjust_standing(state, actor, target, SEPARATIST_PENALTY);
        }
        CovertOp::PlantPropaganda => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.modifiers.insert(Modifier::PropagandaTarget);
            }
            adjust_standing(state, actor, target, PROPAGANDA_BONUS);
        }
    }

    let severity = match op {
        CovertOp::PlantPropaganda => 1,
        _ => 2,
    };
    let target_name = state
        .nations
        .get(target)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| target.to_string());
    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::CovertAction,
        severity,
        format!("Covert activity in {target_name}"),
        format!("Foreign interference has been reported inside {target_name}."),
        vec![actor.to_string(), target.to_string()],
        date,
        tick,
    );

    log::debug!("[COVERT] {} ran {:?} against {}", actor, op, target);
    Ok(true)
}

/// Deduct the cost from the actor. The player pays from the absolute
/// budget; AI nations pay down their economy index.
fn charge_budget(state: &mut WorldState, actor: &str, cost: i64) -> Result<(), CommandError> {
    let is_player = state
        .nations
        .get(actor)
        .map(|n| n.is_player)
        .unwrap_or(false);

    if is_player {
        let available = state.nations.get(actor).map(|n| n.budget).unwrap_or(0);
        if available < cost {
            return Err(CommandError::InsufficientFunds {
                required: cost,
                available,
            });
        }
        if let Some(nation) = state.nations.get_mut(actor) {
            nation.budget -= cost;
        }
    } else {
        // 10k budget units per economy point.
        let points = (cost / 10_000).max(1) as i32;
        let available = state
            .nations
            .get(actor)
            .map(|n| n.economy.get())
            .unwrap_or(0);
        if available < points {
            return Err(CommandError::InsufficientFunds {
                required: cost,
                available: available as i64 * 10_000,
            });
        }
        if let Some(nation) = state.nations.get_mut(actor) {
            nation.economy.add(-points);
        }
    }
    Ok(())
}
