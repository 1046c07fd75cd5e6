//! Read-only country reference data.
//!
//! Population, religion, culture, language and government come from an
//! external provider; the core only consumes lookups. Missing entries fall
//! back to fixed defaults at registry initialization (population 1-5M drawn
//! from the world RNG, economy/authority 50).

use crate::state::GovernmentKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryProfile {
    pub name: String,
    pub population: u64,
    pub religion: String,
    pub culture: String,
    pub language: String,
    pub government: GovernmentKind,
}

pub trait ReferenceData {
    fn profile(&self, code: &str) -> Option<CountryProfile>;
}

/// In-memory provider backed by a plain map; the driver loads it from a
/// scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticReferenceData {
    profiles: HashMap<String, CountryProfile>,
}

impl StaticReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, code: &str, profile: CountryProfile) -> Self {
        self.profiles.insert(code.to_string(), profile);
        self
    }

    pub fn insert(&mut self, code: &str, profile: CountryProfile) {
        self.profiles.insert(code.to_string(), profile);
    }
}

impl ReferenceData for StaticReferenceData {
    fn profile(&self, code: &str) -> Option<CountryProfile> {
        self.profiles.get(code).cloned()
    }
}

/// Provider with no entries; every lookup takes the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyReferenceData;

impl ReferenceData for EmptyReferenceData {
    fn profile(&self, _code: &str) -> Option<CountryProfile> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let data = StaticReferenceData::new().with_profile(
            "JPN",
            CountryProfile {
                name: "Japan".into(),
                population: 125_000_000,
                religion: "Shinto".into(),
                culture: "Japanese".into(),
                language: "Japanese".into(),
                government: GovernmentKind::Democracy,
            },
        );

        assert_eq!(data.profile("JPN").unwrap().population, 125_000_000);
        assert!(data.profile("XXX").is_none());
    }
}
