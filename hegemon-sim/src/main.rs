use anyhow::Result;
use clap::Parser;
use hegemon_core::{registry, step_world, NullGeometry, SimConfig, SimMetrics};
use std::path::PathBuf;

mod loader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON); falls back to the built-in demo world
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of monthly ticks to run
    #[arg(short, long, default_value_t = 24)]
    ticks: u32,

    /// World RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Player nation code
    #[arg(long, default_value = "PLR")]
    player: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("Starting hegemon-sim...");

    let (seeds, reference) = loader::load_scenario(args.scenario.as_deref())?;
    let config = SimConfig::default();
    let mut state = registry::initialize(&seeds, &reference, &args.player, args.seed);

    log::info!(
        "Initial state: {} nations, date {}",
        state.nations.len(),
        state.date
    );

    // Game loop: step, then stream any new diplomatic events as JSONL.
    let mut event_cursor = 0usize;
    for _ in 0..args.ticks {
        state = step_world(&state, &[], &NullGeometry, &config);

        for event in state.events.since(event_cursor) {
            println!("{}", serde_json::to_string(event)?);
        }
        event_cursor = state.events.len();

        log::debug!(
            "Tick {} | date {} | checksum {:016x}",
            state.tick,
            state.date,
            state.checksum()
        );
    }

    let metrics = SimMetrics::from_events(&state.events);
    log::info!(
        "wars={} battles={} annexations={} agreements={} article5={}",
        metrics.wars_declared,
        metrics.battles_fought,
        metrics.annexations,
        metrics.agreements_signed,
        metrics.article_five_invocations
    );
    println!(
        "simulation finished: {} ticks, {} events, final date {}",
        state.tick,
        state.events.len(),
        state.date
    );

    Ok(())
}
