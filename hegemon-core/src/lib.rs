//! # Hegemon Core
//!
//! Geopolitical conflict-simulation core for a territorial-conquest
//! strategy game. Each simulated month the core decides how dozens of
//! non-player nations posture, fight, ally, and capitulate, and resolves
//! the numeric outcome of every battle and diplomatic exchange.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ AI Strategy  │────▶│ PlayerInputs │────▶│ step_world  │
//! │ (per nation) │     │ (commands)   │     │ (full pass) │
//! └──────────────┘     └──────────────┘     └──────┬──────┘
//!                                                  │
//!                      ┌──────────────┐     ┌──────▼──────┐
//!                      │  Event sink  │◀────│ WorldState  │
//!                      │  (JSONL log) │     │ (registry)  │
//!                      └──────────────┘     └─────────────┘
//! ```
//!
//! ## Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`WorldState`] | Complete simulation state (nations, wars, coalitions) |
//! | [`Command`] | Player and AI actions (declare war, propose agreement, ...) |
//! | [`step_world`] | One tick: `(state, inputs) -> state` |
//! | [`Strategy`] | AI dispatch, one implementation per personality |
//! | [`GeometryProvider`] | External polygon service boundary |
//! | [`EventLog`] | Append-only diplomatic event stream |
//!
//! Rendering, UI, save files, polygon math, and country reference data all
//! live outside this crate; the core consumes them through traits and
//! produces only committed state and events.

pub mod ai;
pub mod bounded;
pub mod combat;
pub mod config;
pub mod deferred;
pub mod events;
pub mod geometry;
pub mod input;
pub mod metrics;
pub mod power;
pub mod refdata;
pub mod registry;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;


pub use ai::{Personality, Strategy, StrategyState};
pub use bounded::{new_relations, new_territory_lost, BoundedInt};
pub use combat::{simulate, BattleReport, Intensity, Side};
pub use config::SimConfig;
pub use events::{DiplomaticEvent, EventKind, EventLog};
pub use geometry::{GeometryProvider, NullGeometry, RegionRef};
pub use input::{Command, PlayerInputs};
pub use metrics::SimMetrics;
pub use power::{composite_power, nation_power, PowerInputs};
pub use refdata::{CountryProfile, ReferenceData, StaticReferenceData};
pub use registry::NationSeed;
pub use state::{Date, Disposition, Modifier, Nation, Tariff, WorldState};
pub use step::{step_world, CommandError};
