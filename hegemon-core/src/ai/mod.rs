//! AI strategy engine.
//!
//! Every nation is assigned one fixed personality on first assessment and
//! keeps it for the whole run. Each tick the engine re-evaluates threat and
//! focus and queues 0-2 intended actions, which the orchestrator applies
//! through the regular diplomatic instruments. Dispatch is a [`Strategy`]
//! trait with one implementation per personality variant.

pub mod defensive;
pub mod expansionist;
pub mod ideological;
pub mod isolationist;
pub mod opportunist;
pub mod trading;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::SimConfig;
use crate::power::coalition_strength;
use crate::registry::{actionable, adjust_standing, declare_war, update_occupation};
use crate::state::{AgreementKind, Code, Modifier, Tariff, WorldState};
use crate::systems::coalition::maybe_invoke_article_five;
use crate::systems::diplomacy::{propose_agreement, set_tariff};

pub use defensive::Defensive;
pub use expansionist::Expansionist;
pub use ideological::Ideological;
pub use isolationist::Isolationist;
pub use opportunist::Opportunist;
pub use trading::TradingPower;

/// Fixed per-nation temperament. Assigned once, never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Expansionist,
    Opportunist,
    Defensive,
    Isolationist,
    TradingPower,
    Ideological,
}

impl Personality {
    pub const ALL: [Personality; 6] = [
        Personality::Expansionist,
        Personality::Opportunist,
        Personality::Defensive,
        Personality::Isolationist,
        Personality::TradingPower,
        Personality::Ideological,
    ];

    /// 1 (dove) to 5 (hawk). Aggression >= 4 counts as a genuine reason to
    /// fight despite coalition restraint.
    pub fn aggression(&self) -> u8 {
        match self {
            Personality::Expansionist => 5,
            Personality::Opportunist => 4,
            Personality::Ideological => 3,
            Personality::Defensive => 2,
            Personality::TradingPower => 2,
            Personality::Isolationist => 1,
        }
    }

    /// Multiplier on the base war-declaration chance.
    pub fn war_appetite(&self) -> f64 {
        match self {
            Personality::Expansionist => 4.0,
            Personality::Opportunist => 2.5,
            Personality::Ideological => 2.0,
            Personality::TradingPower => 0.5,
            Personality::Defensive => 0.3,
            Personality::Isolationist => 0.1,
        }
    }
}

/// Current strategic posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Expand,
    Consolidate,
    Ally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DeclareWar,
    DemandTerritory,
    BuildMilitary,
    ProposeAlliance,
    TradeAgreement,
    Sanction,
    ImproveRelations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub kind: ActionKind,
    pub target: Option<Code>,
}

impl QueuedAction {
    pub fn new(kind: ActionKind, target: Option<&str>) -> Self {
        Self {
            kind,
            target: target.map(|s| s.to_string()),
        }
    }
}

/// Situational threat estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Strongest hostile force relative to our own coalition strength.
    pub level: f64,
    pub principal: Option<Code>,
}

/// Per-nation strategy state carried between ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyState {
    pub personality: Personality,
    pub focus: Focus,
    pub threat: ThreatAssessment,
    pub queue: VecDeque<QueuedAction>,
}

/// One tick's worth of strategic intent.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub focus: Focus,
    pub actions: Vec<QueuedAction>,
}

/// Personality dispatch. One implementation per variant; each exposes a
/// pure situational assessment producing the tick's action queue.
pub trait Strategy: Send + Sync {
    fn personality(&self) -> Personality;

    fn assess(
        &self,
        code: &str,
        state: &WorldState,
        threat: &ThreatAssessment,
        rng: &mut StdRng,
    ) -> Assessment;
}

pub fn strategy_for(personality: Personality) -> &'static dyn Strategy {
    match personality {
        Personality::Expansionist => &Expansionist,
        Personality::Opportunist => &Opportunist,
        Personality::Defensive => &Defensive,
        Personality::Isolationist => &Isolationist,
        Personality::TradingPower => &TradingPower,
        Personality::Ideological => &Ideological,
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Relative power of the scariest neighbor, coalition, or player.
pub fn assess_threat(state: &WorldState, code: &str) -> ThreatAssessment {
    let own = coalition_strength(state, code).max(1) as f64;
    let Some(us) = state.nations.get(code) else {
        return ThreatAssessment::default();
    };

    let mut worst: Option<(f64, Code)> = None;
    for other_code in state.sorted_codes() {
        if other_code == code {
            continue;
        }
        let other = &state.nations[&other_code];
        if other.is_annexed {
            continue;
        }
        let standing = state.standing(code, &other_code);
        if standing > 0 && !state.are_at_war(code, &other_code) {
            continue;
        }

        let theirs = coalition_strength(state, &other_code) as f64;
        let proximity = 1.0 / (1.0 + distance(us.location, other.location) / 50.0);
        let ratio = (theirs / own) * proximity;
        if worst.as_ref().map(|(r, _)| ratio > *r).unwrap_or(true) {
            worst = Some((ratio, other_code.clone()));
        }
    }

    match worst {
        Some((level, principal)) => ThreatAssessment {
            level: level.min(10.0),
            principal: Some(principal),
        },
        None => ThreatAssessment::default(),
    }
}

/// Per-tick probability that `aggressor` actually pulls the trigger on a
/// queued war declaration. Deliberately small at base, scaled up by
/// personality and desperation, down by distance and coalition deterrence.
pub fn war_declaration_chance(
    state: &WorldState,
    config: &SimConfig,
    aggressor: &str,
    target: &str,
) -> f64 {
    // Shared coalition membership is an absolute veto.
    if state.share_coalition(aggressor, target) {
        return 0.0;
    }
    let (Some(a), Some(t)) = (state.nations.get(aggressor), state.nations.get(target)) else {
        return 0.0;
    };

    let personality = match &a.strategy {
        Some(s) => s.personality,
        None => return 0.0,
    };

    let mut chance = config.war_base_chance * personality.war_appetite();

    // Desperation rises with territory already lost.
    chance *= 1.0 + a.territory_lost.get() as f64 / 25.0;

    // Far-away targets are much less tempting.
    chance *= 1.0 / (1.0 + distance(a.location, t.location) / config.distance_half_chance);

    // Coalition-adjusted deterrence ladder.
    let own = coalition_strength(state, aggressor).max(1) as f64;
    let theirs = coalition_strength(state, target) as f64;
    let ratio = theirs / own;
    chance *= if ratio > 5.0 {
        0.02
    } else if ratio > 3.0 {
        0.1
    } else if ratio > 2.0 {
        0.3
    } else if ratio > 1.5 {
        0.6
    } else {
        1.0
    };

    // Membership in a military coalition restrains a nation that has no
    // genuine reason to fight.
    if state.military_coalition_of(aggressor).is_some() {
        let genuine = personality.aggression() >= 4
            || a.territory_lost.get() > 10
            || state.standing(aggressor, target) < -30;
        if !genuine {
            chance *= 0.1;
        }
    }

    chance.clamp(0.0, 0.25)
}

/// The double gate on war declarations: the action queue must contain the
/// intent AND relations must be at the floor (or revanchism burning).
fn war_gate_open(state: &WorldState, config: &SimConfig, aggressor: &str, target: &str) -> bool {
    let Some(nation) = state.nations.get(aggressor) else {
        return false;
    };
    state.standing(aggressor, target) <= config.war_relations_floor
        || nation.modifiers.contains(Modifier::Revanchism)
}

/// Walk the registry, re-assess every AI nation, and apply its queued
/// actions through the diplomatic instruments.
pub fn run_ai_tick(state: &mut WorldState, config: &SimConfig, rng: &mut StdRng) {
    for code in state.sorted_codes() {
        let skip = state
            .nations
            .get(&code)
            .map(|n| n.is_player || n.is_annexed)
            .unwrap_or(true);
        if skip {
            continue;
        }

        // First assessment assigns the lifetime personality.
        if state.nations[&code].strategy.is_none() {
            let personality = Personality::ALL[rng.gen_range(0..Personality::ALL.len())];
            if let Some(nation) = state.nations.get_mut(&code) {
                nation.strategy = Some(StrategyState {
                    personality,
                    focus: Focus::Consolidate,
                    threat: ThreatAssessment::default(),
                    queue: VecDeque::new(),
                });
            }
        }

        let threat = assess_threat(state, &code);
        let personality = state.nations[&code]
            .strategy
            .as_ref()
            .expect("assigned above")
            .personality;
        let assessment = strategy_for(personality).assess(&code, state, &threat, rng);

        let mut actions = assessment.actions;
        actions.truncate(config.max_actions_per_tick);

        if let Some(nation) = state.nations.get_mut(&code) {
            if let Some(strategy) = nation.strategy.as_mut() {
                strategy.focus = assessment.focus;
                strategy.threat = threat;
                strategy.queue = actions.iter().cloned().collect();
            }
        }

        for action in actions {
            apply_action(state, config, &code, &action, rng);
        }
    }
}

fn apply_action(
    state: &mut WorldState,
    config: &SimConfig,
    code: &str,
    action: &QueuedAction,
    rng: &mut StdRng,
) {
    match action.kind {
        ActionKind::DeclareWar => {
            let Some(target) = action.target.as_deref() else {
                return;
            };
            if !actionable(state, target) || state.are_at_war(code, target) {
                return;
            }
            if !war_gate_open(state, config, code, target) {
                return;
            }
            let chance = war_declaration_chance(state, config, code, target);
            if rng.gen::<f64>() < chance && declare_war(state, code, target).is_some() {
                maybe_invoke_article_five(state, code, target, config);
            }
        }
        ActionKind::DemandTerritory => {
            let Some(target) = action.target.as_deref().map(str::to_string) else {
                return;
            };
            if !actionable(state, &target) || state.share_coalition(code, &target) {
                return;
            }
            let own = coalition_strength(state, code) as f64;
            let theirs = coalition_strength(state, &target).max(1) as f64;
            let chance = if own / theirs > 1.5 { 0.3 } else { 0.1 };

            adjust_standing(state, code, &target, -20);
            if rng.gen::<f64>() < chance {
                update_occupation(state, &target, 5, config);
                update_occupation(state, code, -5, config);
                let date = state.date;
                let tick = state.tick;
                state.events.push(
                    crate::events::EventKind::TerritoryDemanded,
                    2,
                    format!("{code} wrings territory from {target}"),
                    format!("{target} cedes land under threat of war."),
                    vec![code.to_string(), target.clone()],
                    date,
                    tick,
                );
            }
        }
        ActionKind::BuildMilitary => {
            if let Some(nation) = state.nations.get_mut(code) {
                let recruits = (nation.soldiers / 10).max(1_000);
                nation.soldiers = nation.soldiers.saturating_add(recruits);
                nation.economy.add(-2);
            }
        }
        ActionKind::ProposeAlliance => {
            if let Some(target) = action.target.as_deref().map(str::to_string) {
                let _ =
                    propose_agreement(state, code, &target, AgreementKind::MilitaryAlliance, rng);
            }
        }
        ActionKind::TradeAgreement => {
            if let Some(target) = action.target.as_deref().map(str::to_string) {
                let _ = propose_agreement(state, code, &target, AgreementKind::Trade, rng);
            }
        }
        ActionKind::Sanction => {
            if let Some(target) = action.target.as_deref().map(str::to_string) {
                set_tariff(state, code, &target, Tariff::Embargo);
            }
        }
        ActionKind::ImproveRelations => {
            if let Some(target) = action.target.as_deref().map(str::to_string) {
                adjust_standing(state, code, &target, 5);
            }
        }
    }
}

// --- shared target-selection helpers ---------------------------------------

/// Weakest non-partner nation, preferring those we already dislike.
pub(crate) fn weakest_rival(state: &WorldState, code: &str) -> Option<Code> {
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .filter(|c| !state.share_coalition(code, c))
        .min_by_key(|c| {
            let n = &state.nations[c];
            let hostility_bonus = if state.standing(code, c) < 0 { 0 } else { 1_000 };
            n.power + hostility_bonus
        })
}

/// The counterpart we are on worst terms with.
pub(crate) fn worst_standing(state: &WorldState, code: &str) -> Option<Code> {
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .min_by_key(|c| state.standing(code, c))
}

/// The counterpart we are on best terms with, excluding existing allies.
pub(crate) fn best_standing_non_ally(state: &WorldState, code: &str) -> Option<Code> {
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
        .max_by_key(|c| state.standing(code, c))
}

/// Strongest economy we are not already trading with.
pub(crate) fn best_trade_prospect(state: &WorldState, code: &str) -> Option<Code> {
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .filter(|c| {
            state
                .nations
                .get(code)
                .map(|n| n.agreement_with(c, AgreementKind::Trade).is_none())
                .unwrap_or(false)
        })
        .max_by_key(|c| state.nations[c].economy.get())
}

/// Nation across the widest ideological gulf, if any gulf is wide enough.
pub(crate) fn ideological_rival(state: &WorldState, code: &str) -> Option<Code> {
    let own = state.nations.get(code)?.politics.ideology.get();
    state
        .sorted_codes()
        .into_iter()
        .filter(|c| c != code)
        .filter(|c| actionable(state, c))
        .filter(|c| !state.share_coalition(code, c))
        .map(|c| {
            let gap = (state.nations[&c].politics.ideology.get() - own).abs();
            (c, gap)
        })
        .filter(|(_, gap)| *gap >= 60)
        .max_by_key(|(_, gap)| *gap)
        .map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;
    use rand::SeedableRng;

    fn with_personality(state: &mut WorldState, code: &str, personality: Personality) {
        state.nation_mut(code).unwrap().strategy = Some(StrategyState {
            personality,
            focus: Focus::Consolidate,
            threat: ThreatAssessment::default(),
            queue: VecDeque::new(),
        });
    }

    #[test]
    fn test_personality_fixed_after_first_assessment() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();

        let mut rng = StdRng::seed_from_u64(3);
        run_ai_tick(&mut state, &config, &mut rng);
        let first = state.nations["AAA"].strategy.as_ref().unwrap().personality;

        for _ in 0..5 {
            run_ai_tick(&mut state, &config, &mut rng);
        }
        let later = state.nations["AAA"].strategy.as_ref().unwrap().personality;
        assert_eq!(first, later);
    }

    #[test]
    fn test_shared_coalition_vetoes_war_chance() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_military_coalition("Pact", "AAA", &["AAA", "BBB"])
            .build();
        with_personality(&mut state, "AAA", Personality::Expansionist);
        state.diplomacy.set_tie("AAA", "BBB", -100);

        assert_eq!(war_declaration_chance(&state, &config, "AAA", "BBB"), 0.0);
    }

    #[test]
    fn test_revanchism_and_losses_raise_war_chance() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("CCC")
            .with_nation("BBB")
            .build();
        with_personality(&mut state, "AAA", Personality::Opportunist);
        with_personality(&mut state, "CCC", Personality::Opportunist);
        state.diplomacy.set_tie("AAA", "BBB", -60);
        state.diplomacy.set_tie("CCC", "BBB", -60);

        // AAA has bled territory and wants it back; CCC is otherwise
        // identical but whole.
        state.nation_mut("AAA").unwrap().territory_lost.set(40);
        state
            .nation_mut("AAA")
            .unwrap()
            .modifiers
            .insert(Modifier::Revanchism);

        let desperate = war_declaration_chance(&state, &config, "AAA", "BBB");
        let content = war_declaration_chance(&state, &config, "CCC", "BBB");
        assert!(desperate > content);
    }

    #[test]
    fn test_deterrence_ladder_suppresses_chance() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();
        with_personality(&mut state, "AAA", Personality::Expansionist);
        state.nation_mut("AAA").unwrap().soldiers = 10_000;

        state.nation_mut("BBB").unwrap().soldiers = 10_000;
        let par = war_declaration_chance(&state, &config, "AAA", "BBB");

        state.nation_mut("BBB").unwrap().soldiers = 60_000;
        let outgunned = war_declaration_chance(&state, &config, "AAA", "BBB");

        assert!(outgunned < par * 0.05);
    }

    #[test]
    fn test_war_gate_needs_floor_or_revanchism() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .build();

        state.diplomacy.set_tie("AAA", "BBB", -30);
        assert!(!war_gate_open(&state, &config, "AAA", "BBB"));

        state.diplomacy.set_tie("AAA", "BBB", -60);
        assert!(war_gate_open(&state, &config, "AAA", "BBB"));

        state.diplomacy.set_tie("AAA", "BBB", 0);
        state
            .nation_mut("AAA")
            .unwrap()
            .modifiers
            .insert(Modifier::Revanchism);
        assert!(war_gate_open(&state, &config, "AAA", "BBB"));
    }

    #[test]
    fn test_threat_names_the_scariest_hostile() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BIG")
            .with_nation("SML")
            .build();
        state.nation_mut("BIG").unwrap().soldiers = 500_000;
        state.nation_mut("SML").unwrap().soldiers = 5_000;
        state.diplomacy.set_tie("AAA", "BIG", -50);
        state.diplomacy.set_tie("AAA", "SML", -50);

        let threat = assess_threat(&state, "AAA");
        assert_eq!(threat.principal.as_deref(), Some("BIG"));
        assert!(threat.level > 1.0);
    }

    #[test]
    fn test_ai_tick_caps_actions() {
        let config = SimConfig::default();
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_nation("CCC")
            .build();

        let mut rng = StdRng::seed_from_u64(12);
        run_ai_tick(&mut state, &config, &mut rng);

        // The queue recorded for the tick never exceeds the cap.
        for nation in state.nations.values() {
            if let Some(strategy) = &nation.strategy {
                assert!(strategy.queue.len() <= config.max_actions_per_tick);
            }
        }
    }
}
