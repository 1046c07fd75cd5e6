use anyhow::{Context, Result};
use hegemon_core::state::GovernmentKind;
use hegemon_core::{CountryProfile, NationSeed, StaticReferenceData};
use serde_json::Value;
use std::path::Path;

/// Built-in demo scenario used when no file is supplied.
fn demo_scenario() -> (Vec<NationSeed>, StaticReferenceData) {
    let spec: &[(&str, &str, (f64, f64), u32)] = &[
        ("ARD", "Ardenia", (10.0, 20.0), 80_000),
        ("BEL", "Belmara", (18.0, 24.0), 55_000),
        ("COR", "Corvath", (40.0, 15.0), 120_000),
        ("DRA", "Dravina", (44.0, 40.0), 95_000),
        ("ELM", "Elmsworth", (70.0, 30.0), 60_000),
        ("FEN", "Fennmark", (75.0, 60.0), 35_000),
        ("GAL", "Galtia", (20.0, 70.0), 70_000),
        ("HEL", "Helvria", (55.0, 75.0), 45_000),
        ("ITH", "Ithlon", (85.0, 10.0), 110_000),
        ("JUR", "Jurra", (5.0, 50.0), 25_000),
    ];

    let seeds = spec
        .iter()
        .map(|(code, name, location, soldiers)| {
            let mut seed = NationSeed::new(code, name, *location);
            seed.soldiers = Some(*soldiers);
            seed
        })
        .collect();

    (seeds, StaticReferenceData::new())
}

/// Load a scenario from a JSON file:
///
/// ```json
/// [{"code":"ARD","name":"Ardenia","x":10,"y":20,
///   "soldiers":80000,"population":9000000,"religion":"...","culture":"..."}]
/// ```
///
/// Profile fields are optional; missing data falls back to the core's
/// reference-data defaults.
pub fn load_scenario(path: Option<&Path>) -> Result<(Vec<NationSeed>, StaticReferenceData)> {
    let Some(path) = path else {
        return Ok(demo_scenario());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let entries: Vec<Value> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let mut seeds = Vec::new();
    let mut reference = StaticReferenceData::new();

    for entry in entries {
        let code = entry["code"]
            .as_str()
            .context("scenario entry missing code")?
            .to_string();
        let name = entry["name"].as_str().unwrap_or(&code).to_string();
        let x = entry["x"].as_f64().unwrap_or(0.0);
        let y = entry["y"].as_f64().unwrap_or(0.0);

        let mut seed = NationSeed::new(&code, &name, (x, y));
        if let Some(soldiers) = entry["soldiers"].as_u64() {
            seed.soldiers = Some(soldiers as u32);
        }
        if let Some(economy) = entry["economy"].as_i64() {
            seed.economy = Some(economy as i32);
        }

        if let Some(population) = entry["population"].as_u64() {
            reference.insert(
                &code,
                CountryProfile {
                    name: name.clone(),
                    population,
                    religion: entry["religion"].as_str().unwrap_or_default().to_string(),
                    culture: entry["culture"].as_str().unwrap_or_default().to_string(),
                    language: entry["language"].as_str().unwrap_or_default().to_string(),
                    government: GovernmentKind::Democracy,
                },
            );
        }

        seeds.push(seed);
    }

    Ok((seeds, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scenario_nonempty() {
        let (seeds, _) = demo_scenario();
        assert!(seeds.len() >= 8);
        assert!(seeds.iter().all(|s| !s.code.is_empty()));
    }
}
