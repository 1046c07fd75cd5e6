use crate::bounded::{new_ideology, new_percent, new_relations, new_territory_lost, BoundedInt};
use crate::deferred::WorkQueue;
use crate::events::EventLog;
use crate::geometry::RegionRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A specific month in the simulated timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u8, // 1-12
}

impl Date {
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }

    /// Adds whole months; one tick = one month.
    pub fn add_months(&self, months: u32) -> Self {
        let total = (self.month as u32 - 1) + months;
        Self {
            year: self.year + (total / 12) as i32,
            month: (total % 12) as u8 + 1,
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new(2020, 1)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.year, self.month)
    }
}

/// Stable nation key (ISO-style short code).
pub type Code = String;
pub type WarId = u32;
pub type CoalitionId = u32;
pub type CoalitionWarId = u32;
pub type ResolutionId = u32;
pub type CrisisId = u32;
pub type SummitId = u32;
pub type AgreementId = u32;

/// Coarse diplomatic stance derived from relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Friendly,
    Neutral,
    Hostile,
    AtWar,
}

impl Disposition {
    /// Stance from raw relations. `AtWar` is never derived here: it is pinned
    /// by the registry while a war record exists.
    pub fn from_relations(relations: i32) -> Self {
        if relations >= 25 {
            Disposition::Friendly
        } else if relations <= -25 {
            Disposition::Hostile
        } else {
            Disposition::Neutral
        }
    }
}

/// Tariff posture toward a specific trade partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tariff {
    FreeTrade,
    None,
    Low,
    High,
    Embargo,
}

impl Tariff {
    /// Relations delta applied when this level is imposed.
    pub fn relations_delta(&self) -> i32 {
        match self {
            Tariff::FreeTrade => 10,
            Tariff::None => 0,
            Tariff::Low => 0,
            Tariff::High => -10,
            Tariff::Embargo => -50,
        }
    }
}

/// Standing effects carried by a nation. Closed set; membership is checked
/// via the enum, never by string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Revanchism,
    Allied,
    AtWar,
    Destabilized,
    Humiliated,
    SeparatistUnrest,
    PropagandaTarget,
    Sanctioned,
    Annexed,
}

impl Modifier {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub const ALL: [Modifier; 9] = [
        Modifier::Revanchism,
        Modifier::Allied,
        Modifier::AtWar,
        Modifier::Destabilized,
        Modifier::Humiliated,
        Modifier::SeparatistUnrest,
        Modifier::PropagandaTarget,
        Modifier::Sanctioned,
        Modifier::Annexed,
    ];
}

/// Bitset over the closed [`Modifier`] enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSet(u16);

impl ModifierSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, m: Modifier) {
        self.0 |= m.bit();
    }

    pub fn remove(&mut self, m: Modifier) {
        self.0 &= !m.bit();
    }

    pub fn contains(&self, m: Modifier) -> bool {
        self.0 & m.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.iter().copied().filter(|m| self.contains(*m))
    }
}

/// Type of bilateral agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementKind {
    Trade,
    NonAggression,
    MilitaryAlliance,
    FreeTrade,
    SecurityGuarantee,
}

/// A signed bilateral agreement. Stored on the holding nation; `with` names
/// the counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub id: AgreementId,
    pub kind: AgreementKind,
    pub with: Code,
    pub signed: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentKind {
    Democracy,
    Monarchy,
    Autocracy,
    Theocracy,
    MilitaryJunta,
}

impl Default for GovernmentKind {
    fn default() -> Self {
        GovernmentKind::Democracy
    }
}

/// Internal political sub-record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Politics {
    pub government: GovernmentKind,
    pub leader: String,
    /// Ideological orientation, -100 (hard left) to +100 (hard right).
    pub ideology: BoundedInt,
    /// Unrest, 0 to 100. Stability for scoring purposes is 100 - unrest.
    pub unrest: BoundedInt,
}

impl Default for Politics {
    fn default() -> Self {
        Self {
            government: GovernmentKind::default(),
            leader: String::new(),
            ideology: new_ideology(0),
            unrest: new_percent(0),
        }
    }
}

/// One nation record. One per non-player country plus one synthetic record
/// for the player's own polity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nation {
    pub code: Code,
    pub name: String,

    /// Standing toward the player, -100 to +100. Clamped on every write.
    pub relations: BoundedInt,
    /// Derived from relations except while at war (pinned to `AtWar`).
    pub disposition: Disposition,
    /// Percent of original land ceded, 0 to 100.
    pub territory_lost: BoundedInt,

    pub population: u64,
    pub soldiers: u32,
    /// 0-100 index for AI nations. The player uses `budget` instead.
    pub economy: BoundedInt,
    /// Absolute budget; only meaningful for the player record.
    pub budget: i64,
    pub authority: BoundedInt,
    /// Composite strength, recomputed by the power scorer.
    pub power: i32,
    /// Multiplier applied to the composite score (covert damage lands here).
    pub power_penalty: f64,

    pub modifiers: ModifierSet,
    pub agreements: Vec<Agreement>,
    pub next_agreement_id: AgreementId,

    /// Our tariff against them / theirs against us.
    pub tariff: Tariff,
    pub their_tariff: Tariff,

    pub politics: Politics,
    pub allies: Vec<Code>,
    pub enemies: Vec<Code>,

    /// Soft-power currency spent by influence actions.
    pub influence: i32,
    pub research_level: u32,
    pub buildings: u32,

    pub religion: String,
    pub culture: String,
    /// Abstract map coordinates used for distance scaling. The real polygon
    /// lives in the external geometry service.
    pub location: (f64, f64),
    /// Opaque handle into the geometry service, if any.
    pub territory: Option<RegionRef>,

    pub is_player: bool,
    pub is_annexed: bool,
    pub annexed_by: Option<Code>,

    pub strategy: Option<crate::ai::StrategyState>,
}

impl Nation {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            relations: new_relations(),
            disposition: Disposition::Neutral,
            territory_lost: new_territory_lost(),
            population: 0,
            soldiers: 0,
            economy: new_percent(50),
            budget: 0,
            authority: new_percent(50),
            power: 0,
            power_penalty: 1.0,
            modifiers: ModifierSet::empty(),
            agreements: Vec::new(),
            next_agreement_id: 0,
            tariff: Tariff::None,
            their_tariff: Tariff::None,
            politics: Politics::default(),
            allies: Vec::new(),
            enemies: Vec::new(),
            influence: 0,
            research_level: 0,
            buildings: 0,
            religion: String::new(),
            culture: String::new(),
            location: (0.0, 0.0),
            territory: None,
            is_player: false,
            is_annexed: false,
            annexed_by: None,
            strategy: None,
        }
    }

    pub fn is_at_war(&self) -> bool {
        self.modifiers.contains(Modifier::AtWar)
    }

    /// Recompute disposition from relations, honoring the at-war pin.
    pub fn refresh_disposition(&mut self) {
        if self.is_at_war() {
            self.disposition = Disposition::AtWar;
        } else {
            self.disposition = Disposition::from_relations(self.relations.get());
        }
    }

    pub fn agreement_with(&self, other: &str, kind: AgreementKind) -> Option<&Agreement> {
        self.agreements
            .iter()
            .find(|a| a.with == other && a.kind == kind)
    }
}

/// Status of a nation-vs-nation war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarStatus {
    Active,
    Peace,
    Victory,
    Defeat,
}

/// Active war between two nations. Gains are mutually reducing percentages
/// of the opponent's original land.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub attacker: Code,
    pub defender: Code,
    pub start: Date,
    pub start_tick: u64,
    pub attacker_gain: BoundedInt,
    pub defender_gain: BoundedInt,
    pub attacker_casualties: u64,
    pub defender_casualties: u64,
    pub status: WarStatus,
    /// Tick of the last resolved battle (rate limiter).
    pub last_battle_tick: u64,
}

impl War {
    pub fn new(id: WarId, attacker: &str, defender: &str, start: Date, start_tick: u64) -> Self {
        Self {
            id,
            attacker: attacker.to_string(),
            defender: defender.to_string(),
            start,
            start_tick,
            attacker_gain: new_territory_lost(),
            defender_gain: new_territory_lost(),
            attacker_casualties: 0,
            defender_casualties: 0,
            status: WarStatus::Active,
            last_battle_tick: start_tick,
        }
    }

    pub fn involves(&self, code: &str) -> bool {
        self.attacker == code || self.defender == code
    }

    pub fn opponent_of(&self, code: &str) -> Option<&str> {
        if self.attacker == code {
            Some(&self.defender)
        } else if self.defender == code {
            Some(&self.attacker)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoalitionKind {
    Military,
    Trade,
    Research,
}

/// Optional gate on coalition membership, checked against the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipRequirements {
    pub religion: Option<String>,
    pub culture: Option<String>,
    /// Minimum standing with the coalition leader.
    pub min_relations: Option<i32>,
    /// Military coalitions: minimum standing army.
    pub min_soldiers: Option<u32>,
    /// Trade coalitions: minimum economy index.
    pub min_economy: Option<i32>,
    /// Research coalitions: minimum research level.
    pub min_research: Option<u32>,
}

/// A named alliance with ordered membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coalition {
    pub id: CoalitionId,
    pub name: String,
    pub kind: CoalitionKind,
    pub leader: Code,
    pub members: Vec<Code>,
    pub requirements: Option<MembershipRequirements>,
    pub founded: Date,
}

impl Coalition {
    pub fn is_member(&self, code: &str) -> bool {
        self.members.iter().any(|m| m == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoalitionWarStatus {
    Active,
    Victory,
    Defeat,
    Peace,
}

/// Tracks an Article-5 cascade as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoalitionWar {
    pub id: CoalitionWarId,
    pub coalition: CoalitionId,
    pub aggressor: Code,
    pub defender: Code,
    /// Allies that actually mobilized reinforcements.
    pub mobilized: Vec<Code>,
    pub casualties: u64,
    /// Aggressor territory_lost at cascade time, for the victory threshold.
    pub aggressor_territory_baseline: i32,
    pub status: CoalitionWarStatus,
    pub start_tick: u64,
}

/// Vote on a UN resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Yes,
    No,
    Abstain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    /// Economic sanctions against a nation.
    Sanction { target: Code },
    /// Formal condemnation; relations/standing damage only.
    Condemn { target: Code },
    /// Aid package improving the target's economy.
    AidPackage { target: Code },
    /// Calls on two belligerents to stand down.
    Ceasefire { a: Code, b: Code },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Open,
    Passed,
    Failed,
    Vetoed,
}

/// A UN resolution moving through the voting state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub id: ResolutionId,
    pub title: String,
    pub kind: ResolutionKind,
    pub proposer: Code,
    pub votes: HashMap<Code, Vote>,
    /// Subject to the Security-Council veto gate.
    pub vetoable: bool,
    pub status: ResolutionStatus,
    pub opened_tick: u64,
}

/// Crisis phases are strictly ordinal; each phase narrows the action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisPhase {
    Incident,
    Demands,
    Ultimatum,
    Mobilization,
    War,
}

impl CrisisPhase {
    pub fn ordinal(&self) -> u8 {
        match self {
            CrisisPhase::Incident => 1,
            CrisisPhase::Demands => 2,
            CrisisPhase::Ultimatum => 3,
            CrisisPhase::Mobilization => 4,
            CrisisPhase::War => 5,
        }
    }

    pub fn next(&self) -> Option<CrisisPhase> {
        match self {
            CrisisPhase::Incident => Some(CrisisPhase::Demands),
            CrisisPhase::Demands => Some(CrisisPhase::Ultimatum),
            CrisisPhase::Ultimatum => Some(CrisisPhase::Mobilization),
            CrisisPhase::Mobilization => Some(CrisisPhase::War),
            CrisisPhase::War => None,
        }
    }

    pub fn prev(&self) -> Option<CrisisPhase> {
        match self {
            CrisisPhase::Incident => None,
            CrisisPhase::Demands => Some(CrisisPhase::Incident),
            CrisisPhase::Ultimatum => Some(CrisisPhase::Demands),
            CrisisPhase::Mobilization => Some(CrisisPhase::Ultimatum),
            CrisisPhase::War => Some(CrisisPhase::Mobilization),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisAction {
    BackDown,
    HoldFirm,
    Escalate,
    SeekMediation,
    ProposeSummit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisOutcome {
    Defused,
    War,
}

/// A bilateral crisis advancing through phases 1..5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crisis {
    pub id: CrisisId,
    pub instigator: Code,
    pub respondent: Code,
    pub phase: CrisisPhase,
    pub opened_tick: u64,
    pub last_action_tick: u64,
    pub outcome: Option<CrisisOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummitTopic {
    TradeTerms,
    BorderAssurances,
    ArmsLimits,
    CulturalTies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummitStatus {
    Pending,
    Concluded,
    Declined,
}

/// A negotiation over independent topic proposals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summit {
    pub id: SummitId,
    pub host: Code,
    pub guest: Code,
    pub topics: Vec<SummitTopic>,
    /// Parallel to `topics`; filled on conclusion.
    pub outcomes: Vec<bool>,
    pub status: SummitStatus,
    pub opened_tick: u64,
}

/// Bilateral standing between two AI nations, keyed by sorted code pair.
/// (Standing toward the player lives on the nation record itself.)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiplomacyState {
    pub ties: HashMap<(Code, Code), i32>,
}

impl DiplomacyState {
    fn key(a: &str, b: &str) -> (Code, Code) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn tie(&self, a: &str, b: &str) -> i32 {
        self.ties.get(&Self::key(a, b)).copied().unwrap_or(0)
    }

    pub fn adjust_tie(&mut self, a: &str, b: &str, delta: i32) {
        let entry = self.ties.entry(Self::key(a, b)).or_insert(0);
        *entry = (*entry + delta).clamp(-100, 100);
    }

    pub fn set_tie(&mut self, a: &str, b: &str, value: i32) {
        self.ties.insert(Self::key(a, b), value.clamp(-100, 100));
    }
}

/// Complete simulation state. Exclusively owned by the core; outer layers
/// only read snapshots between ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldState {
    pub date: Date,
    pub tick: u64,
    pub rng_seed: u64,
    /// Current RNG state; advanced once per tick so a fixed seed reproduces
    /// a run end to end.
    pub rng_state: u64,

    /// The player's synthetic nation code.
    pub player: Code,
    pub nations: FxHashMap<Code, Nation>,

    pub wars: HashMap<WarId, War>,
    pub next_war_id: WarId,

    pub coalitions: HashMap<CoalitionId, Coalition>,
    pub next_coalition_id: CoalitionId,
    pub coalition_wars: HashMap<CoalitionWarId, CoalitionWar>,
    pub next_coalition_war_id: CoalitionWarId,

    pub resolutions: HashMap<ResolutionId, Resolution>,
    pub next_resolution_id: ResolutionId,
    pub crises: HashMap<CrisisId, Crisis>,
    pub next_crisis_id: CrisisId,
    pub summits: HashMap<SummitId, Summit>,
    pub next_summit_id: SummitId,

    pub diplomacy: DiplomacyState,
    pub events: EventLog,
    pub deferred: WorkQueue,
}

impl WorldState {
    pub fn nation(&self, code: &str) -> Option<&Nation> {
        self.nations.get(code)
    }

    pub fn nation_mut(&mut self, code: &str) -> Option<&mut Nation> {
        self.nations.get_mut(code)
    }

    /// Check if two nations currently have an active war with each other.
    pub fn are_at_war(&self, a: &str, b: &str) -> bool {
        self.wars.values().any(|w| {
            w.status == WarStatus::Active
                && ((w.attacker == a && w.defender == b) || (w.attacker == b && w.defender == a))
        })
    }

    /// All active wars a nation is involved in.
    pub fn wars_involving(&self, code: &str) -> Vec<WarId> {
        let mut ids: Vec<WarId> = self
            .wars
            .values()
            .filter(|w| w.status == WarStatus::Active && w.involves(code))
            .map(|w| w.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The nation's military coalition, if it belongs to one.
    pub fn military_coalition_of(&self, code: &str) -> Option<&Coalition> {
        self.coalitions
            .values()
            .find(|c| c.kind == CoalitionKind::Military && c.is_member(code))
    }

    /// Whether two nations share any coalition. Shared membership is an
    /// absolute veto on that pair becoming AI-vs-AI war rivals.
    pub fn share_coalition(&self, a: &str, b: &str) -> bool {
        self.coalitions
            .values()
            .any(|c| c.is_member(a) && c.is_member(b))
    }

    /// Bilateral standing; the player's relations field is authoritative for
    /// pairs involving the player.
    pub fn standing(&self, a: &str, b: &str) -> i32 {
        if a == self.player {
            self.nations.get(b).map(|n| n.relations.get()).unwrap_or(0)
        } else if b == self.player {
            self.nations.get(a).map(|n| n.relations.get()).unwrap_or(0)
        } else {
            self.diplomacy.tie(a, b)
        }
    }

    /// Sorted nation codes, for deterministic iteration order.
    pub fn sorted_codes(&self) -> Vec<Code> {
        let mut codes: Vec<Code> = self.nations.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Compute a deterministic checksum of the world state.
    ///
    /// Used for replay validation and debugging state divergence. Identical
    /// states produce identical checksums.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.date.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        self.rng_state.hash(&mut hasher);

        // Nations (sorted by code for determinism)
        for code in self.sorted_codes() {
            let n = &self.nations[&code];
            code.hash(&mut hasher);
            n.relations.get().hash(&mut hasher);
            n.territory_lost.get().hash(&mut hasher);
            n.population.hash(&mut hasher);
            n.soldiers.hash(&mut hasher);
            n.economy.get().hash(&mut hasher);
            n.budget.hash(&mut hasher);
            n.authority.get().hash(&mut hasher);
            n.power.hash(&mut hasher);
            n.modifiers.hash(&mut hasher);
            n.is_annexed.hash(&mut hasher);
            n.agreements.len().hash(&mut hasher);
        }

        // Wars (sorted by ID)
        let mut war_ids: Vec<_> = self.wars.keys().copied().collect();
        war_ids.sort_unstable();
        for id in war_ids {
            let w = &self.wars[&id];
            id.hash(&mut hasher);
            w.attacker.hash(&mut hasher);
            w.defender.hash(&mut hasher);
            w.attacker_gain.get().hash(&mut hasher);
            w.defender_gain.get().hash(&mut hasher);
            w.attacker_casualties.hash(&mut hasher);
            w.defender_casualties.hash(&mut hasher);
        }

        // Coalitions (sorted by ID)
        let mut coalition_ids: Vec<_> = self.coalitions.keys().copied().collect();
        coalition_ids.sort_unstable();
        for id in coalition_ids {
            let c = &self.coalitions[&id];
            id.hash(&mut hasher);
            c.leader.hash(&mut hasher);
            c.members.hash(&mut hasher);
        }

        self.events.len().hash(&mut hasher);

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_add_months() {
        let d = Date::new(2020, 1);
        assert_eq!(d.add_months(1), Date::new(2020, 2));
        assert_eq!(d.add_months(12), Date::new(2021, 1));
        assert_eq!(d.add_months(14), Date::new(2021, 3));
        assert_eq!(Date::new(2020, 11).add_months(3), Date::new(2021, 2));
    }

    #[test]
    fn test_disposition_from_relations() {
        assert_eq!(Disposition::from_relations(50), Disposition::Friendly);
        assert_eq!(Disposition::from_relations(0), Disposition::Neutral);
        assert_eq!(Disposition::from_relations(-60), Disposition::Hostile);
    }

    #[test]
    fn test_modifier_set() {
        let mut m = ModifierSet::empty();
        assert!(m.is_empty());

        m.insert(Modifier::Revanchism);
        m.insert(Modifier::AtWar);
        assert!(m.contains(Modifier::Revanchism));
        assert!(m.contains(Modifier::AtWar));
        assert!(!m.contains(Modifier::Humiliated));

        m.remove(Modifier::AtWar);
        assert!(!m.contains(Modifier::AtWar));
        assert_eq!(m.iter().count(), 1);
    }

    #[test]
    fn test_crisis_phase_ordering() {
        let mut phase = CrisisPhase::Incident;
        let mut seen = vec![phase.ordinal()];
        while let Some(next) = phase.next() {
            phase = next;
            seen.push(phase.ordinal());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_tie_key_symmetric() {
        let mut d = DiplomacyState::default();
        d.adjust_tie("ZAF", "ARG", -30);
        assert_eq!(d.tie("ARG", "ZAF"), -30);
        assert_eq!(d.tie("ZAF", "ARG"), -30);

        d.adjust_tie("ARG", "ZAF", -200);
        assert_eq!(d.tie("ZAF", "ARG"), -100); // clamped
    }

    #[test]
    fn test_checksum_determinism() {
        use crate::testing::WorldStateBuilder;

        let state = WorldStateBuilder::new()
            .with_nation("FRA")
            .with_nation("DEU")
            .build();

        assert_eq!(state.checksum(), state.checksum());

        let other = WorldStateBuilder::new().with_nation("FRA").build();
        assert_ne!(state.checksum(), other.checksum());
    }
}
