use crate::state::{
    Agreement, AgreementKind, Coalition, CoalitionKind, Date, Nation, WorldState,
};

/// Deterministic pseudo-location so distance math has something to chew on
/// without a real map.
fn location_for(code: &str) -> (f64, f64) {
    let mut x = 0u32;
    let mut y = 0u32;
    for (i, b) in code.bytes().enumerate() {
        x = x.wrapping_add((b as u32).wrapping_mul(7 + i as u32));
        y = y.wrapping_add((b as u32).wrapping_mul(13 + i as u32));
    }
    ((x % 100) as f64, (y % 100) as f64)
}

pub struct WorldStateBuilder {
    state: WorldState,
}

impl WorldStateBuilder {
    pub fn new() -> Self {
        Self {
            state: WorldState {
                date: Date::new(2020, 1),
                ..Default::default()
            },
        }
    }

    pub fn date(mut self, year: i32, month: u8) -> Self {
        self.state.date = Date::new(year, month);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.state.rng_seed = seed;
        self.state.rng_state = seed;
        self
    }

    /// Install the synthetic player record.
    pub fn player(mut self, code: &str) -> Self {
        self.state.player = code.to_string();
        let mut nation = Nation::new(code, code);
        nation.is_player = true;
        nation.population = 10_000_000;
        nation.soldiers = 100_000;
        nation.budget = 1_000_000;
        nation.location = location_for(code);
        self.state.nations.insert(code.to_string(), nation);
        self
    }

    /// Add a nation with generous test defaults.
    pub fn with_nation(mut self, code: &str) -> Self {
        let mut nation = Nation::new(code, code);
        nation.population = 5_000_000;
        nation.soldiers = 50_000;
        nation.location = location_for(code);
        self.state.nations.insert(code.to_string(), nation);
        self
    }

    /// Record a mirrored agreement between two already-added nations.
    pub fn with_agreement(mut self, a: &str, b: &str, kind: AgreementKind) -> Self {
        let date = self.state.date;
        for (us, them) in [(a, b), (b, a)] {
            if let Some(nation) = self.state.nations.get_mut(us) {
                let id = nation.next_agreement_id;
                nation.next_agreement_id += 1;
                nation.agreements.push(Agreement {
                    id,
                    kind,
                    with: them.to_string(),
                    signed: date,
                });
            }
        }
        self
    }

    /// Add a military coalition over already-added nations.
    pub fn with_military_coalition(mut self, name: &str, leader: &str, members: &[&str]) -> Self {
        let id = self.state.next_coalition_id;
        self.state.next_coalition_id += 1;
        self.state.coalitions.insert(
            id,
            Coalition {
                id,
                name: name.to_string(),
                kind: CoalitionKind::Military,
                leader: leader.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
                requirements: None,
                founded: self.state.date,
            },
        );
        self
    }

    pub fn build(self) -> WorldState {
        self.state
    }
}

impl Default for WorldStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let state = WorldStateBuilder::default()
            .player("PLR")
            .with_nation("AAA")
            .with_nation("BBB")
            .with_military_coalition("Pact", "AAA", &["AAA", "BBB"])
            .build();

        assert_eq!(state.player, "PLR");
        assert!(state.nations.contains_key("AAA"));
        assert!(state.nation("PLR").unwrap().is_player);
        assert_eq!(state.coalitions.len(), 1);
        assert!(state.share_coalition("AAA", "BBB"));
    }

    #[test]
    fn test_locations_deterministic_and_distinct() {
        assert_eq!(location_for("FRA"), location_for("FRA"));
        assert_ne!(location_for("FRA"), location_for("JPN"));
    }
}
