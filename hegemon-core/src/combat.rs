//! Multi-round battle resolution.
//!
//! A battle is a sequence of discrete rounds applying stochastic losses to
//! both sides, shaped by the relative force ratio and the engagement
//! intensity. Deterministic given a seeded RNG; under ambient randomness it
//! is intentionally irreproducible run to run.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of a side's starting force below which it stops fighting.
const DEFAULT_FORCE_FLOOR: f64 = 0.25;

/// Default round cap when the caller does not supply one.
const DEFAULT_ROUND_CAP: u32 = 12;

/// Engagement intensity; scales loss severity up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Skirmish,
    Standard,
    TotalWar,
}

impl Intensity {
    pub fn loss_multiplier(&self) -> f64 {
        match self {
            Intensity::Skirmish => 0.5,
            Intensity::Standard => 1.0,
            Intensity::TotalWar => 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

/// Losses applied in one combat round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CombatRound {
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

/// Outcome of a full battle resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub rounds: Vec<CombatRound>,
    pub attacker_remaining: u32,
    pub defender_remaining: u32,
    pub winner: Side,
    /// Normalized [0,1] margin of victory; consumed downstream to scale
    /// territorial transfer.
    pub decisiveness: f64,
}

impl BattleReport {
    pub fn attacker_casualties(&self) -> u64 {
        self.rounds.iter().map(|r| r.attacker_losses as u64).sum()
    }

    pub fn defender_casualties(&self) -> u64 {
        self.rounds.iter().map(|r| r.defender_losses as u64).sum()
    }
}

/// Run a battle with the default floor and round cap.
pub fn simulate(
    attacker_force: u32,
    defender_force: u32,
    intensity: Intensity,
    defense_bonus: f64,
    rng: &mut impl Rng,
) -> BattleReport {
    simulate_with_limits(
        attacker_force,
        defender_force,
        intensity,
        defense_bonus,
        DEFAULT_FORCE_FLOOR,
        DEFAULT_ROUND_CAP,
        rng,
    )
}

/// Run a battle with explicit termination limits.
///
/// `defense_bonus` in [0,1] reduces effective losses to the defender.
/// Winner is whichever side retains the larger fraction of its starting
/// force; ties favor the defender.
pub fn simulate_with_limits(
    attacker_force: u32,
    defender_force: u32,
    intensity: Intensity,
    defense_bonus: f64,
    force_floor: f64,
    round_cap: u32,
    rng: &mut impl Rng,
) -> BattleReport {
    let defense_bonus = defense_bonus.clamp(0.0, 0.9);
    let attacker_start = attacker_force.max(1) as f64;
    let defender_start = defender_force.max(1) as f64;

    let mut attacker = attacker_start;
    let mut defender = defender_start;
    let mut rounds = Vec::new();

    for _ in 0..round_cap {
        if attacker / attacker_start < force_floor || defender / defender_start < force_floor {
            break;
        }

        let total = attacker + defender;

        // Each side's loss rate is proportional to the opponent's share of
        // the combined force, with independent per-side jitter so evenly
        // matched forces still diverge.
        let base_attacker: f64 = rng.gen_range(0.04..0.10) * intensity.loss_multiplier();
        let base_defender: f64 = rng.gen_range(0.04..0.10) * intensity.loss_multiplier();
        let attacker_rate = base_attacker * (2.0 * defender / total);
        let defender_rate = base_defender * (2.0 * attacker / total) * (1.0 - defense_bonus);

        let attacker_losses = (attacker * attacker_rate).min(attacker);
        let defender_losses = (defender * defender_rate).min(defender);

        attacker -= attacker_losses;
        defender -= defender_losses;

        rounds.push(CombatRound {
            attacker_losses: attacker_losses.round() as u32,
            defender_losses: defender_losses.round() as u32,
        });
    }

    let attacker_frac = attacker / attacker_start;
    let defender_frac = defender / defender_start;

    // Ties favor the defender.
    let winner = if attacker_frac > defender_frac {
        Side::Attacker
    } else {
        Side::Defender
    };

    let decisiveness = if attacker_frac.max(defender_frac) > 0.0 {
        ((attacker_frac - defender_frac).abs() / attacker_frac.max(defender_frac)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    BattleReport {
        rounds,
        attacker_remaining: attacker.round() as u32,
        defender_remaining: defender.round() as u32,
        winner,
        decisiveness,
    }
}
