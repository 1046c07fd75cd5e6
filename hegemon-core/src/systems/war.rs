//! War progression.
//!
//! Advances every active war by at most one battle resolution per
//! `battle_interval` ticks (independent per war, no cross-war ordering
//! guarantee). The military and relations outcome of a battle is always
//! applied; the associated territory transfer goes through the deferred
//! geometry queue and may fail without consequence.

use rand::Rng;

use crate::combat::{self, Intensity, Side};
use crate::config::SimConfig;
use crate::deferred::DeferredEffect;
use crate::events::EventKind;
use crate::geometry::ConquestPlan;
use crate::registry::{make_peace, update_occupation};
use crate::state::{WarId, WarStatus, WorldState};

/// Below this force a side cannot give battle and is routed instead.
const ROUT_FLOOR: u32 = 100;

/// Occupation percent transferred by a rout (no battle fought).
const ROUT_GAIN: i32 = 8;

pub fn run_war_tick(state: &mut WorldState, config: &SimConfig, rng: &mut impl Rng) {
    let mut ids: Vec<WarId> = state
        .wars
        .values()
        .filter(|w| w.status == WarStatus::Active)
        .map(|w| w.id)
        .collect();
    ids.sort_unstable();

    for id in ids {
        // Earlier resolutions this tick may have closed the war.
        let Some(war) = state.wars.get(&id) else {
            continue;
        };

        if state.tick < war.last_battle_tick + config.battle_interval {
            continue;
        }

        let attacker = war.attacker.clone();
        let defender = war.defender.clone();
        let attacker_force = state
            .nations
            .get(&attacker)
            .map(|n| n.soldiers)
            .unwrap_or(0);
        let defender_force = state
            .nations
            .get(&defender)
            .map(|n| n.soldiers)
            .unwrap_or(0);

        if attacker_force < ROUT_FLOOR && defender_force < ROUT_FLOOR {
            // Two exhausted armies; the timeout will close this out.
            check_termination(state, id, config);
            continue;
        }

        if attacker_force < ROUT_FLOOR || defender_force < ROUT_FLOOR {
            let (winner, loser) = if attacker_force >= ROUT_FLOOR {
                (attacker.clone(), defender.clone())
            } else {
                (defender.clone(), attacker.clone())
            };
            apply_gain(state, id, &winner, &loser, ROUT_GAIN, 0.8, config);
            if let Some(war) = state.wars.get_mut(&id) {
                war.last_battle_tick = state.tick;
            }
            check_termination(state, id, config);
            continue;
        }

        let intensity = pick_intensity(state, id, attacker_force, defender_force);
        let defense_bonus = 0.1
            + state
                .nations
                .get(&defender)
                .map(|n| n.authority.ratio() * 0.15)
                .unwrap_or(0.0);

        let report = combat::simulate_with_limits(
            attacker_force,
            defender_force,
            intensity,
            defense_bonus,
            config.combat_force_floor,
            config.combat_round_cap,
            rng,
        );

        let attacker_losses = report.attacker_casualties();
        let defender_losses = report.defender_casualties();

        // Military outcome is always applied, whatever geometry later says.
        if let Some(nation) = state.nations.get_mut(&attacker) {
            nation.soldiers = report.attacker_remaining;
        }
        if let Some(nation) = state.nations.get_mut(&defender) {
            nation.soldiers = report.defender_remaining;
        }
        if let Some(war) = state.wars.get_mut(&id) {
            war.attacker_casualties += attacker_losses;
            war.defender_casualties += defender_losses;
            war.last_battle_tick = state.tick;
        }

        // Aggregate the cascade's butcher bill.
        for cw in state.coalition_wars.values_mut() {
            if cw.status == crate::state::CoalitionWarStatus::Active
                && (cw.aggressor == attacker || cw.aggressor == defender)
            {
                cw.casualties += attacker_losses + defender_losses;
            }
        }

        let (winner, loser) = match report.winner {
            Side::Attacker => (attacker.clone(), defender.clone()),
            Side::Defender => (defender.clone(), attacker.clone()),
        };
        // Higher decisiveness yields larger territorial consequences.
        let gain = (2.0 + report.decisiveness * 8.0).round() as i32;
        apply_gain(state, id, &winner, &loser, gain, report.decisiveness, config);

        let date = state.date;
        let tick = state.tick;
        state.events.push(
            EventKind::BattleFought,
            2,
            format!("Battle between {attacker} and {defender}"),
            format!(
                "{winner} prevails; casualties {attacker_losses} vs {defender_losses}."
            ),
            vec![attacker.clone(), defender.clone()],
            date,
            tick,
        );

        check_termination(state, id, config);
    }
}

fn pick_intensity(
    state: &WorldState,
    id: WarId,
    attacker_force: u32,
    defender_force: u32,
) -> Intensity {
    let war = &state.wars[&id];
    let in_cascade = state.coalition_wars.values().any(|cw| {
        cw.status == crate::state::CoalitionWarStatus::Active
            && (cw.aggressor == war.attacker || cw.aggressor == war.defender)
    });
    let deep = war.attacker_gain.get().max(war.defender_gain.get()) > 25;

    if in_cascade || deep {
        Intensity::TotalWar
    } else if attacker_force < 20_000 && defender_force < 20_000 {
        Intensity::Skirmish
    } else {
        Intensity::Standard
    }
}

/// Apply a battle's territorial consequences: war gains are mutually
/// reducing, occupation percentages move, and the conquest geometry is
/// queued for the next tick.
fn apply_gain(
    state: &mut WorldState,
    id: WarId,
    winner: &str,
    loser: &str,
    gain: i32,
    decisiveness: f64,
    config: &SimConfig,
) {
    if gain <= 0 {
        return;
    }
    if let Some(war) = state.wars.get_mut(&id) {
        if winner == war.attacker {
            war.attacker_gain.add(gain);
            war.defender_gain.add(-gain);
        } else {
            war.defender_gain.add(gain);
            war.attacker_gain.add(-gain);
        }
    }

    update_occupation(state, loser, gain, config);
    update_occupation(state, winner, -gain, config);

    let location = state.nations.get(loser).map(|n| n.location);
    state.deferred.push(DeferredEffect::ApplyConquest {
        winner: winner.to_string(),
        loser: loser.to_string(),
        decisiveness,
        plan: Some(ConquestPlan::Border),
        location,
    });
}

/// Forced-peace and timeout checks for one war.
fn check_termination(state: &mut WorldState, id: WarId, config: &SimConfig) {
    let Some(war) = state.wars.get(&id) else {
        return;
    };
    let attacker = war.attacker.clone();
    let defender = war.defender.clone();

    let forced = war.attacker_gain.get() >= config.forced_peace_gain
        || war.defender_gain.get() >= config.forced_peace_gain;
    let timed_out = state.tick >= war.start_tick + config.war_timeout;

    if forced {
        let date = state.date;
        let tick = state.tick;
        state.events.push(
            EventKind::ForcedPeace,
            2,
            format!("{attacker} and {defender} forced to the table"),
            "Territorial losses have forced an end to the fighting.".to_string(),
            vec![attacker.clone(), defender.clone()],
            date,
            tick,
        );
        make_peace(state, &attacker, &defender);
    } else if timed_out {
        log::debug!("[WAR] {} vs {} timed out into white peace", attacker, defender);
        make_peace(state, &attacker, &defender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn war_state() -> WorldState {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        state.nation_mut("AAA").unwrap().soldiers = 80_000;
        state.nation_mut("BBB").unwrap().soldiers = 60_000;
        let _ = crate::registry::declare_war(&mut state, "AAA", "BBB");
        state
    }

    #[test]
    fn test_battle_rate_limited() {
        let config = SimConfig::default();
        let mut state = war_state();
        let mut rng = StdRng::seed_from_u64(2);

        // Declared this tick: interval has not elapsed yet.
        run_war_tick(&mut state, &config, &mut rng);
        let war = state.wars.values().next().unwrap();
        assert_eq!(war.attacker_casualties, 0);

        state.tick += config.battle_interval;
        run_war_tick(&mut state, &config, &mut rng);
        let war = state.wars.values().next().unwrap();
        assert!(war.attacker_casualties > 0);
        assert!(war.defender_casualties > 0);
    }

    #[test]
    fn test_battle_moves_occupation_and_queues_geometry() {
        let config = SimConfig::default();
        let mut state = war_state();
        state.tick += config.battle_interval;

        let mut rng = StdRng::seed_from_u64(2);
        run_war_tick(&mut state, &config, &mut rng);

        let war = state.wars.values().next().unwrap();
        let total_gain = war.attacker_gain.get() + war.defender_gain.get();
        assert!(total_gain > 0);
        assert!(!state.deferred.is_empty());

        // One side ceded land.
        let a = state.nation("AAA").unwrap().territory_lost.get();
        let b = state.nation("BBB").unwrap().territory_lost.get();
        assert!(a > 0 || b > 0);
    }

    #[test]
    fn test_forced_peace_at_gain_threshold() {
        let config = SimConfig::default();
        let mut state = war_state();
        let id = *state.wars.keys().next().unwrap();
        state
            .wars
            .get_mut(&id)
            .unwrap()
            .attacker_gain
            .set(config.forced_peace_gain);

        check_termination(&mut state, id, &config);
        assert!(!state.are_at_war("AAA", "BBB"));
        assert!(state
            .events
            .of_kind(EventKind::ForcedPeace)
            .next()
            .is_some());
    }

    #[test]
    fn test_timeout_white_peace() {
        let config = SimConfig::default();
        let mut state = war_state();
        state.tick += config.war_timeout;

        let mut rng = StdRng::seed_from_u64(2);
        run_war_tick(&mut state, &config, &mut rng);
        assert!(!state.are_at_war("AAA", "BBB"));
    }

    #[test]
    fn test_routed_defender_cedes_without_battle() {
        let config = SimConfig::default();
        let mut state = war_state();
        state.nation_mut("BBB").unwrap().soldiers = 0;
        state.tick += config.battle_interval;

        let mut rng = StdRng::seed_from_u64(2);
        run_war_tick(&mut state, &config, &mut rng);

        assert_eq!(
            state.nation("BBB").unwrap().territory_lost.get(),
            ROUT_GAIN
        );
        let war = state.wars.values().next();
        if let Some(war) = war {
            assert_eq!(war.attacker_casualties, 0);
        }
    }

    #[test]
    fn test_repeated_routs_trigger_revanchism() {
        let config = SimConfig::default();
        let mut state = war_state();
        state.nation_mut("BBB").unwrap().soldiers = 0;

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2 {
            state.tick += config.battle_interval;
            run_war_tick(&mut state, &config, &mut rng);
        }

        let nation = state.nation("BBB").unwrap();
        assert_eq!(nation.territory_lost.get(), 2 * ROUT_GAIN);
        assert!(nation.modifiers.contains(crate::state::Modifier::Revanchism));
    }
}
