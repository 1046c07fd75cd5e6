//! Defensive stale-state cleanup.
//!
//! Runs at the start of every tick. No operation is permitted to leave a
//! record internally inconsistent, but deferred completions and cascade
//! orderings can strand state between write phases; this pass repairs all
//! of it before anything else reads the registry.

use crate::registry::annex;
use crate::state::{Modifier, WarStatus, WorldState};
use crate::systems::coalition::dissolve_small_coalitions;

pub fn run_cleanup_tick(state: &mut WorldState) {
    force_total_annexations(state);
    repair_war_pins(state);
    scrub_annexed_participants(state);
    dissolve_small_coalitions(state);
}

/// A nation with nothing left to cede is forcibly annexed by whoever took
/// the most from it (or simply removed from play).
fn force_total_annexations(state: &mut WorldState) {
    for code in state.sorted_codes() {
        let doomed = state
            .nations
            .get(&code)
            .map(|n| !n.is_annexed && n.territory_lost.get() >= 100)
            .unwrap_or(false);
        if !doomed {
            continue;
        }

        let annexer = state
            .wars
            .values()
            .filter(|w| w.status == WarStatus::Active && w.involves(&code))
            .max_by_key(|w| {
                if w.attacker == code {
                    w.defender_gain.get()
                } else {
                    w.attacker_gain.get()
                }
            })
            .and_then(|w| w.opponent_of(&code))
            .map(|s| s.to_string());

        log::info!("[CLEANUP] {} fully occupied, forcing annexation", code);
        annex(state, &code, annexer.as_deref());
    }
}

/// The at-war pin and the war table must agree in both directions.
fn repair_war_pins(state: &mut WorldState) {
    for code in state.sorted_codes() {
        let has_war = !state.wars_involving(&code).is_empty();
        if let Some(nation) = state.nations.get_mut(&code) {
            let pinned = nation.modifiers.contains(Modifier::AtWar);
            if pinned && !has_war {
                nation.modifiers.remove(Modifier::AtWar);
                nation.refresh_disposition();
            } else if !pinned && has_war && !nation.is_annexed {
                nation.modifiers.insert(Modifier::AtWar);
                nation.refresh_disposition();
            }
        }
    }
}

/// Annexed nations must not appear in any war or coalition; re-running the
/// (idempotent) annexation scrubs any stragglers.
fn scrub_annexed_participants(state: &mut WorldState) {
    let annexed: Vec<String> = state
        .nations
        .values()
        .filter(|n| n.is_annexed)
        .filter(|n| {
            !state.wars_involving(&n.code).is_empty()
                || state.coalitions.values().any(|c| c.is_member(&n.code))
        })
        .map(|n| n.code.clone())
        .collect();

    for code in annexed {
        let by = state
            .nations
            .get(&code)
            .and_then(|n| n.annexed_by.clone());
        annex(state, &code, by.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_total_loss_forces_annexation() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        let _ = crate::registry::declare_war(&mut state, "AAA", "BBB");
        let id = *state.wars.keys().next().unwrap();
        state.wars.get_mut(&id).unwrap().attacker_gain.set(60);
        state.nation_mut("BBB").unwrap().territory_lost.set(100);

        run_cleanup_tick(&mut state);

        let nation = state.nation("BBB").unwrap();
        assert!(nation.is_annexed);
        assert_eq!(nation.annexed_by.as_deref(), Some("AAA"));
        assert!(state.wars.is_empty());
    }

    #[test]
    fn test_orphaned_at_war_pin_cleared() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state
            .nation_mut("AAA")
            .unwrap()
            .modifiers
            .insert(Modifier::AtWar);
        state.nation_mut("AAA").unwrap().refresh_disposition();

        run_cleanup_tick(&mut state);

        let nation = state.nation("AAA").unwrap();
        assert!(!nation.is_at_war());
        assert_ne!(nation.disposition, crate::state::Disposition::AtWar);
    }

    #[test]
    fn test_missing_pin_restored() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        let _ = crate::registry::declare_war(&mut state, "AAA", "BBB");
        state
            .nation_mut("AAA")
            .unwrap()
            .modifiers
            .remove(Modifier::AtWar);

        run_cleanup_tick(&mut state);
        assert!(state.nation("AAA").unwrap().is_at_war());
    }

    #[test]
    fn test_annexed_scrubbed_from_coalitions() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_nation("CCC")
            .with_military_coalition("Pact", "AAA", &["AAA", "BBB", "CCC"])
            .build();

        // Simulate a stale record: annexed but still on the member list.
        state.nation_mut("CCC").unwrap().is_annexed = true;
        state
            .nation_mut("CCC")
            .unwrap()
            .modifiers
            .insert(Modifier::Annexed);

        run_cleanup_tick(&mut state);
        assert!(state.coalitions.values().all(|c| !c.is_member("CCC")));
    }
}
