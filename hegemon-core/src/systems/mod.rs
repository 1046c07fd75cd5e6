//! Simulation systems: the diplomatic instrument layer, collective
//! defense, war progression, and defensive cleanup.

pub mod cleanup;
pub mod coalition;
pub mod covert;
pub mod crisis;
pub mod diplomacy;
pub mod influence;
pub mod resolutions;
pub mod summit;
pub mod war;

pub use cleanup::run_cleanup_tick;
pub use coalition::{maybe_invoke_article_five, run_coalition_tick};
pub use crisis::run_crisis_tick;
pub use influence::run_influence_tick;
pub use resolutions::run_resolution_tick;
pub use summit::run_summit_tick;
pub use war::run_war_tick;
