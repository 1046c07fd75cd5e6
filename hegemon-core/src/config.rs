use serde::{Deserialize, Serialize};

/// Simulation configuration.
///
/// These are tunable balance parameters, not correctness invariants. The
/// defaults reproduce the shipped game balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Base per-tick war declaration chance before personality and
    /// desperation scaling.
    pub war_base_chance: f64,
    /// Relations at or below this allow a war declaration without the
    /// Revanchism modifier.
    pub war_relations_floor: i32,
    /// territory_lost above this percent auto-adds Revanchism.
    pub revanchism_threshold: i32,
    /// Distance (abstract map units) at which war chance is halved.
    pub distance_half_chance: f64,

    /// Share of the coalition's combined soldiers mobilized by Article 5.
    pub reinforcement_share: f64,
    /// Ticks before an undecided coalition war resolves to stalemate peace.
    pub coalition_war_timeout: u64,
    /// Aggressor territory loss (percent) that counts as coalition victory.
    pub coalition_victory_territory: i32,

    /// Minimum ticks between battle resolutions within one war.
    pub battle_interval: u64,
    /// Maximum combat rounds per battle resolution.
    pub combat_round_cap: u32,
    /// A side whose force falls below this fraction of its starting strength
    /// stops fighting.
    pub combat_force_floor: f64,
    /// Territorial gain (percent) that forces the loser to the table.
    pub forced_peace_gain: i32,
    /// Ticks before a war times out into white peace.
    pub war_timeout: u64,

    /// Budget cost of covert operations.
    pub destabilize_cost: i64,
    pub fund_separatists_cost: i64,
    pub propaganda_cost: i64,

    /// Influence-point costs of soft-power actions.
    pub cultural_exchange_cost: i32,
    pub economic_aid_cost: i32,
    pub espionage_cost: i32,
    pub broadcast_cost: i32,

    /// Monthly influence-point income for every nation.
    pub influence_income: i32,

    /// Fraction of YES votes (of YES+NO) needed to pass a resolution.
    pub resolution_pass_threshold: f64,
    /// Ticks a resolution stays open for voting.
    pub resolution_voting_window: u64,
    /// Permanent Security-Council members holding a veto.
    pub security_council: Vec<String>,

    /// Ticks of inactivity before a crisis cools down one phase.
    pub crisis_stale_after: u64,

    /// Maximum AI actions applied per nation per tick.
    pub max_actions_per_tick: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            war_base_chance: 0.005,
            war_relations_floor: -50,
            revanchism_threshold: 5,
            distance_half_chance: 40.0,

            reinforcement_share: 0.10,
            coalition_war_timeout: 180,
            coalition_victory_territory: 50,

            battle_interval: 2,
            combat_round_cap: 12,
            combat_force_floor: 0.25,
            forced_peace_gain: 50,
            war_timeout: 120,

            destabilize_cost: 50_000,
            fund_separatists_cost: 75_000,
            propaganda_cost: 30_000,

            cultural_exchange_cost: 20,
            economic_aid_cost: 35,
            espionage_cost: 40,
            broadcast_cost: 25,

            influence_income: 5,

            resolution_pass_threshold: 0.5,
            resolution_voting_window: 1,
            security_council: vec![
                "USA".to_string(),
                "CHN".to_string(),
                "RUS".to_string(),
                "GBR".to_string(),
                "FRA".to_string(),
            ],

            crisis_stale_after: 3,

            max_actions_per_tick: 2,
        }
    }
}
