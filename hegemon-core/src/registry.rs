//! Nation registry lifecycle operations.
//!
//! The registry is sparse by design: nations are lazily materialized, and
//! every operation on an unknown code is a silent no-op returning `false`.
//! All numeric writes clamp at the write site; no operation may leave a
//! record internally inconsistent (an at-war disposition always has a
//! matching war record, with defensive repair running at tick start).

use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::deferred::DeferredEffect;
use crate::events::EventKind;
use crate::power::nation_power;
use crate::refdata::ReferenceData;
use crate::state::{
    Code, Modifier, Nation, Tariff, War, WarId, WarStatus, WorldState,
};

/// Seed data for one nation at world creation.
#[derive(Debug, Clone)]
pub struct NationSeed {
    pub code: Code,
    pub name: String,
    pub location: (f64, f64),
    pub soldiers: Option<u32>,
    pub economy: Option<i32>,
}

impl NationSeed {
    pub fn new(code: &str, name: &str, location: (f64, f64)) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            location,
            soldiers: None,
            economy: None,
        }
    }
}

/// Build the initial world: one record per seeded country plus a synthetic
/// record for the player's polity. Missing reference data falls back to
/// fixed defaults (population 1-5M, economy/authority 50).
pub fn initialize(
    seeds: &[NationSeed],
    reference: &dyn ReferenceData,
    player_code: &str,
    rng_seed: u64,
) -> WorldState {
    let mut rng = rand::rngs::StdRng::seed_from_u64(rng_seed);
    let mut state = WorldState {
        rng_seed,
        rng_state: rng_seed,
        player: player_code.to_string(),
        ..Default::default()
    };

    for seed in seeds {
        let mut nation = Nation::new(&seed.code, &seed.name);
        nation.location = seed.location;

        match reference.profile(&seed.code) {
            Some(profile) => {
                nation.population = profile.population;
                nation.religion = profile.religion;
                nation.culture = profile.culture;
                nation.politics.government = profile.government;
                if !profile.name.is_empty() {
                    nation.name = profile.name;
                }
            }
            None => {
                nation.population = rng.gen_range(1_000_000u64..=5_000_000);
            }
        }

        nation.soldiers = seed
            .soldiers
            .unwrap_or_else(|| (nation.population / 100).min(u32::MAX as u64) as u32);
        if let Some(economy) = seed.economy {
            nation.economy.set(economy);
        }

        state.nations.insert(seed.code.clone(), nation);
    }

    // Synthetic player record.
    let mut player = Nation::new(player_code, player_code);
    player.is_player = true;
    player.relations.set(100);
    player.budget = 1_000_000;
    player.population = 10_000_000;
    player.soldiers = 100_000;
    state.nations.insert(player_code.to_string(), player);

    refresh_all_power(&mut state);
    state
}

/// A nation can be the target of diplomatic or military action only while
/// it exists and is not annexed.
pub fn actionable(state: &WorldState, code: &str) -> bool {
    state
        .nations
        .get(code)
        .map(|n| !n.is_annexed)
        .unwrap_or(false)
}

/// Clamped relations adjustment toward the player; recomputes disposition.
pub fn update_relations(state: &mut WorldState, code: &str, delta: i32) -> bool {
    match state.nations.get_mut(code) {
        Some(nation) => {
            nation.relations.add(delta);
            nation.refresh_disposition();
            true
        }
        None => false,
    }
}

/// Adjust the bilateral standing between two parties. Pairs involving the
/// player route through the nation's `relations` field; AI pairs through
/// the diplomacy ties table. Always clamped.
pub fn adjust_standing(state: &mut WorldState, a: &str, b: &str, delta: i32) {
    let player = state.player.clone();
    if a == player {
        update_relations(state, b, delta);
    } else if b == player {
        update_relations(state, a, delta);
    } else {
        state.diplomacy.adjust_tie(a, b, delta);
    }
}

/// Open a war between two nations. Symmetric effects: both sides gain the
/// at-war modifier and a pinned disposition, mutual agreements are torn up,
/// and trade collapses to embargo where the player is involved.
///
/// Returns the new war id, or `None` when either party is missing, annexed,
/// the same nation, or already at war with the other.
pub fn declare_war(state: &mut WorldState, attacker: &str, defender: &str) -> Option<WarId> {
    if attacker == defender
        || !actionable(state, attacker)
        || !actionable(state, defender)
        || state.are_at_war(attacker, defender)
    {
        return None;
    }

    let id = state.next_war_id;
    state.next_war_id += 1;
    let war = War::new(id, attacker, defender, state.date, state.tick);
    state.wars.insert(id, war);

    // Hostilities floor the bilateral standing.
    let current = state.standing(attacker, defender);
    if current > -50 {
        adjust_standing(state, attacker, defender, -50 - current);
    }

    let player = state.player.clone();
    for (us, them) in [(attacker, defender), (defender, attacker)] {
        if let Some(nation) = state.nations.get_mut(us) {
            nation.modifiers.insert(Modifier::AtWar);
            nation.refresh_disposition();
            nation.agreements.retain(|a| a.with != them);
            if !nation.enemies.iter().any(|e| e == them) {
                nation.enemies.push(them.to_string());
            }
            nation.allies.retain(|a| a != them);
            if them == player {
                nation.tariff = Tariff::Embargo;
                nation.their_tariff = Tariff::Embargo;
            }
        }
    }

    let (att_name, def_name) = (display_name(state, attacker), display_name(state, defender));
    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::WarDeclared,
        3,
        format!("{att_name} declares war on {def_name}"),
        format!("{att_name} has opened hostilities against {def_name}."),
        vec![attacker.to_string(), defender.to_string()],
        date,
        tick,
    );

    log::info!("[WAR] {} declares war on {}", attacker, defender);
    Some(id)
}

/// Close the active war between two nations, if any. Clears the at-war pin
/// once no other wars remain and relaxes the embargo to a high tariff.
pub fn make_peace(state: &mut WorldState, a: &str, b: &str) -> bool {
    let war_id = state.wars.values().find_map(|w| {
        (w.status == WarStatus::Active
            && ((w.attacker == a && w.defender == b) || (w.attacker == b && w.defender == a)))
            .then_some(w.id)
    });

    let Some(war_id) = war_id else {
        return false;
    };

    state.wars.remove(&war_id);

    let player = state.player.clone();
    for (us, them) in [(a, b), (b, a)] {
        let still_at_war = !state.wars_involving(us).is_empty();
        if let Some(nation) = state.nations.get_mut(us) {
            if !still_at_war {
                nation.modifiers.remove(Modifier::AtWar);
            }
            nation.refresh_disposition();
            nation.enemies.retain(|e| e != them);
            if them == player && nation.tariff == Tariff::Embargo {
                nation.tariff = Tariff::High;
                nation.their_tariff = Tariff::High;
            }
        }
    }

    let (a_name, b_name) = (display_name(state, a), display_name(state, b));
    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::PeaceMade,
        2,
        format!("Peace between {a_name} and {b_name}"),
        format!("{a_name} and {b_name} have ended their war."),
        vec![a.to_string(), b.to_string()],
        date,
        tick,
    );

    log::info!("[WAR] peace between {} and {}", a, b);
    true
}

/// Annex a nation. Idempotent in effect: soldiers zeroed, annexed flag set,
/// removed from every active war and coalition membership list, regardless
/// of prior state. Territory merging is delegated to the geometry service
/// via the deferred queue.
pub fn annex(state: &mut WorldState, code: &str, annexer: Option<&str>) -> bool {
    if !state.nations.contains_key(code) {
        return false;
    }

    let newly = !state.nations[code].is_annexed;

    if let Some(nation) = state.nations.get_mut(code) {
        nation.is_annexed = true;
        nation.annexed_by = annexer.map(|s| s.to_string());
        nation.soldiers = 0;
        nation.territory_lost.set(100);
        nation.modifiers.insert(Modifier::Annexed);
        nation.modifiers.remove(Modifier::AtWar);
        nation.refresh_disposition();
        nation.strategy = None;
    }

    // Remove from every active war.
    let ended: Vec<WarId> = state
        .wars
        .values()
        .filter(|w| w.involves(code))
        .map(|w| w.id)
        .collect();
    for id in ended {
        if let Some(war) = state.wars.remove(&id) {
            let survivor = war.opponent_of(code).unwrap_or_default().to_string();
            let still_at_war = !state.wars_involving(&survivor).is_empty();
            if let Some(nation) = state.nations.get_mut(&survivor) {
                if !still_at_war {
                    nation.modifiers.remove(Modifier::AtWar);
                }
                nation.refresh_disposition();
                nation.enemies.retain(|e| e != code);
            }
        }
    }

    // Remove from every coalition membership list.
    for coalition in state.coalitions.values_mut() {
        coalition.members.retain(|m| m != code);
    }

    if newly {
        if let Some(annexer) = annexer {
            state.deferred.push(DeferredEffect::MergeAnnexedTerritory {
                annexer: annexer.to_string(),
                annexed: code.to_string(),
            });
        }

        let name = display_name(state, code);
        let by = annexer.map(|a| display_name(state, a));
        let date = state.date;
        let tick = state.tick;
        let description = match &by {
            Some(by) => format!("{name} has been annexed by {by}."),
            None => format!("{name} has ceased to exist as a sovereign state."),
        };
        let mut affected = vec![code.to_string()];
        if let Some(a) = annexer {
            affected.push(a.to_string());
        }
        state.events.push(
            EventKind::Annexation,
            3,
            format!("{name} annexed"),
            description,
            affected,
            date,
            tick,
        );
        log::info!("[REGISTRY] {} annexed (by {:?})", code, annexer);
    }

    true
}

/// Reverse an annexation. The restored state carries a relations penalty, a
/// reset military baseline, and a long memory.
pub fn liberate(state: &mut WorldState, code: &str) -> bool {
    let Some(nation) = state.nations.get(code) else {
        return false;
    };
    if !nation.is_annexed {
        return false;
    }
    let former = nation.annexed_by.clone();

    if let Some(nation) = state.nations.get_mut(code) {
        nation.is_annexed = false;
        nation.annexed_by = None;
        nation.modifiers.remove(Modifier::Annexed);
        nation.modifiers.insert(Modifier::Revanchism);
        nation.territory_lost.set(0);
        nation.soldiers = ((nation.population / 200) as u32).max(1_000);
        nation.relations.add(-10);
        nation.refresh_disposition();
    }

    if let Some(former) = former {
        state.deferred.push(DeferredEffect::RestoreTerritory {
            liberated: code.to_string(),
            from: former,
        });
    }

    let name = display_name(state, code);
    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::Liberation,
        2,
        format!("{name} liberated"),
        format!("{name} has been restored as a sovereign state."),
        vec![code.to_string()],
        date,
        tick,
    );

    true
}

/// Adjust the percentage of original land ceded. Crossing the revanchism
/// threshold marks the nation as wanting its territory back.
pub fn update_occupation(
    state: &mut WorldState,
    code: &str,
    delta_percent: i32,
    config: &SimConfig,
) -> bool {
    match state.nations.get_mut(code) {
        Some(nation) => {
            nation.territory_lost.add(delta_percent);
            if nation.territory_lost.get() > config.revanchism_threshold {
                nation.modifiers.insert(Modifier::Revanchism);
            }
            true
        }
        None => false,
    }
}

/// Recompute the derived power score for every nation.
pub fn refresh_all_power(state: &mut WorldState) {
    for code in state.sorted_codes() {
        let power = nation_power(state, &code);
        if let Some(nation) = state.nations.get_mut(&code) {
            nation.power = power;
        }
    }
}

fn display_name(state: &WorldState, code: &str) -> String {
    state
        .nations
        .get(code)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::EmptyReferenceData;
    use crate::state::Disposition;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_initialize_fallback_defaults() {
        let seeds = vec![
            NationSeed::new("AAA", "Alphaland", (0.0, 0.0)),
            NationSeed::new("BBB", "Betaland", (10.0, 0.0)),
        ];
        let state = initialize(&seeds, &EmptyReferenceData, "PLR", 42);

        let a = state.nation("AAA").unwrap();
        assert!((1_000_000..=5_000_000).contains(&a.population));
        assert_eq!(a.economy.get(), 50);
        assert_eq!(a.authority.get(), 50);
        assert!(state.nation("PLR").unwrap().is_player);
    }

    #[test]
    fn test_unknown_code_is_silent_noop() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        assert!(!update_relations(&mut state, "ZZZ", 10));
        assert!(!annex(&mut state, "ZZZ", None));
        assert!(!liberate(&mut state, "ZZZ"));
        assert!(declare_war(&mut state, "AAA", "ZZZ").is_none());
    }

    #[test]
    fn test_update_relations_recomputes_disposition() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        update_relations(&mut state, "AAA", 60);
        assert_eq!(state.nation("AAA").unwrap().disposition, Disposition::Friendly);

        update_relations(&mut state, "AAA", -200);
        let nation = state.nation("AAA").unwrap();
        assert_eq!(nation.relations.get(), -100); // clamped
        assert_eq!(nation.disposition, Disposition::Hostile);
    }

    #[test]
    fn test_declare_war_symmetric_effects() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();

        let id = declare_war(&mut state, "AAA", "BBB").unwrap();
        assert!(state.wars.contains_key(&id));
        assert!(state.are_at_war("AAA", "BBB"));

        for code in ["AAA", "BBB"] {
            let nation = state.nation(code).unwrap();
            assert!(nation.is_at_war());
            assert_eq!(nation.disposition, Disposition::AtWar);
        }

        // Repeat declaration is refused.
        assert!(declare_war(&mut state, "BBB", "AAA").is_none());
    }

    #[test]
    fn test_war_clears_agreements_between_pair() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_agreement("AAA", "BBB", crate::state::AgreementKind::Trade)
            .build();

        let _ = declare_war(&mut state, "AAA", "BBB");
        assert!(state.nation("AAA").unwrap().agreements.is_empty());
        assert!(state.nation("BBB").unwrap().agreements.is_empty());
    }

    #[test]
    fn test_make_peace_unpins_disposition() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();

        let _ = declare_war(&mut state, "AAA", "BBB");
        assert!(make_peace(&mut state, "AAA", "BBB"));
        assert!(!state.are_at_war("AAA", "BBB"));

        let nation = state.nation("AAA").unwrap();
        assert!(!nation.is_at_war());
        assert_ne!(nation.disposition, Disposition::AtWar);

        // Peace with no war is a no-op.
        assert!(!make_peace(&mut state, "AAA", "BBB"));
    }

    #[test]
    fn test_annex_is_idempotent_in_effect() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_nation("CCC")
            .with_military_coalition("Pact", "BBB", &["BBB", "CCC", "AAA"])
            .build();
        let _ = declare_war(&mut state, "AAA", "BBB");

        for _ in 0..2 {
            assert!(annex(&mut state, "BBB", Some("AAA")));
            let nation = state.nation("BBB").unwrap();
            assert!(nation.is_annexed);
            assert_eq!(nation.soldiers, 0);
            assert!(state.wars_involving("BBB").is_empty());
            assert!(state
                .coalitions
                .values()
                .all(|c| !c.is_member("BBB")));
        }

        // The annexation event fires exactly once.
        let annexations = state
            .events
            .of_kind(EventKind::Annexation)
            .count();
        assert_eq!(annexations, 1);
    }

    #[test]
    fn test_annexed_nation_not_actionable() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        annex(&mut state, "BBB", None);

        assert!(!actionable(&state, "BBB"));
        assert!(declare_war(&mut state, "AAA", "BBB").is_none());
    }

    #[test]
    fn test_liberate_reverses_annexation() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        annex(&mut state, "BBB", Some("AAA"));
        assert!(liberate(&mut state, "BBB"));

        let nation = state.nation("BBB").unwrap();
        assert!(!nation.is_annexed);
        assert!(nation.soldiers >= 1_000);
        assert_eq!(nation.territory_lost.get(), 0);
        assert!(nation.modifiers.contains(Modifier::Revanchism));

        // Only annexed nations can be liberated.
        assert!(!liberate(&mut state, "BBB"));
    }

    #[test]
    fn test_occupation_triggers_revanchism() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();

        update_occupation(&mut state, "AAA", 3, &config);
        assert!(!state
            .nation("AAA")
            .unwrap()
            .modifiers
            .contains(Modifier::Revanchism));

        update_occupation(&mut state, "AAA", 4, &config);
        assert!(state
            .nation("AAA")
            .unwrap()
            .modifiers
            .contains(Modifier::Revanchism));
    }
}
