//! Boundary to the external geometry service.
//!
//! The core never does polygon math. Territory merge/subtract and conquest
//! area calculation are delegated through [`GeometryProvider`]; a `None`
//! result means "no territory changes hands this resolution" and is never
//! fatal — the military and relations outcome of a battle is applied
//! regardless.

use serde::{Deserialize, Serialize};

use crate::state::Code;

/// Opaque handle to a territory polygon owned by the geometry service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionRef(pub u64);

/// How a conquest area should be carved, when the caller has a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConquestPlan {
    /// Bite along the shared border.
    Border,
    /// Cut a corridor toward a strategic point.
    Corridor,
    /// Take an isolated pocket.
    Enclave,
}

/// Inputs to a conquest-area calculation.
#[derive(Debug, Clone)]
pub struct ConquestRequest {
    pub winner: Code,
    pub loser: Code,
    /// Normalized [0,1] margin of victory; scales how much land moves.
    pub decisiveness: f64,
    /// A pre-existing claim region, if the winner holds one.
    pub claim: Option<RegionRef>,
    pub plan: Option<ConquestPlan>,
    /// Battle location hint, abstract map coordinates.
    pub location: Option<(f64, f64)>,
}

pub trait GeometryProvider {
    fn merge_territory(&self, a: RegionRef, b: RegionRef) -> Option<RegionRef>;

    fn subtract_territory(&self, a: RegionRef, b: RegionRef) -> Option<RegionRef>;

    fn calculate_conquest(&self, request: &ConquestRequest) -> Option<RegionRef>;
}

/// Geometry stub for headless runs and tests: every operation reports that
/// no region could be computed, which the core treats as partial success.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeometry;

impl GeometryProvider for NullGeometry {
    fn merge_territory(&self, _a: RegionRef, _b: RegionRef) -> Option<RegionRef> {
        None
    }

    fn subtract_territory(&self, _a: RegionRef, _b: RegionRef) -> Option<RegionRef> {
        None
    }

    fn calculate_conquest(&self, _request: &ConquestRequest) -> Option<RegionRef> {
        None
    }
}
