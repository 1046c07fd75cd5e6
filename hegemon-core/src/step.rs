use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::SimConfig;
use crate::deferred::DeferredEffect;
use crate::geometry::{ConquestRequest, GeometryProvider};
use crate::input::{Command, PlayerInputs};
use crate::registry;
use crate::state::WorldState;
use crate::systems::{
    cleanup, coalition, covert, crisis, diplomacy, influence, resolutions, summit, war,
};

/// Failures surfaced to the command issuer. Missing entities are silent
/// no-ops, not errors; only instruments the caller cannot afford refuse
/// loudly.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("Insufficient influence: required {required}, available {available}")]
    InsufficientInfluence { required: i32, available: i32 },
}

/// Advance the world by one tick (one simulated month).
///
/// The pass is strictly sequential: deferred completions land first, then
/// defensive cleanup, then external commands, then the AI walk, then war
/// progression, coalition upkeep, and the monthly out-of-band instruments.
/// Callers only ever observe the returned committed state, never a
/// mid-tick partial.
pub fn step_world(
    state: &WorldState,
    inputs: &[PlayerInputs],
    geometry: &dyn GeometryProvider,
    config: &SimConfig,
) -> WorldState {
    let mut new_state = state.clone();
    new_state.tick += 1;
    new_state.date = state.date.add_months(1);

    let span = tracing::debug_span!("tick", tick = new_state.tick);
    let _guard = span.enter();

    // The per-tick RNG stream is derived from the stored state so a fixed
    // seed reproduces a run end to end.
    let mut rng = StdRng::seed_from_u64(new_state.rng_state ^ new_state.tick);
    new_state.rng_state = rng.gen();

    // 1. Deferred completions from earlier ticks merge back in.
    drain_deferred(&mut new_state, geometry);

    // 2. Defensive stale-state cleanup.
    cleanup::run_cleanup_tick(&mut new_state);

    // 3. External commands.
    for player_input in inputs {
        for cmd in &player_input.commands {
            if let Err(e) =
                execute_command(&mut new_state, &player_input.nation, cmd, config, &mut rng)
            {
                log::warn!(
                    "Failed to execute command for {}: {}",
                    player_input.nation,
                    e
                );
            }
        }
    }

    // 4. Monthly upkeep and derived scores.
    registry::refresh_all_power(&mut new_state);
    influence::run_influence_tick(&mut new_state, config);

    // 5. AI pass, sequential over the registry.
    crate::ai::run_ai_tick(&mut new_state, config, &mut rng);

    // 6. Active wars advance, rate-limited per war.
    war::run_war_tick(&mut new_state, config, &mut rng);

    // 7. Coalition upkeep and collective-defense resolution.
    coalition::run_coalition_tick(&mut new_state, config);

    // 8. Out-of-band instruments consumed once per month.
    resolutions::run_resolution_tick(&mut new_state, config, &mut rng);
    crisis::run_crisis_tick(&mut new_state, config);
    summit::run_summit_tick(&mut new_state, config, &mut rng);

    registry::refresh_all_power(&mut new_state);
    new_state
}

/// Dispatch one command through the instrument layer.
///
/// `Ok(false)` is the silent no-op path (unknown codes, annexed targets,
/// ineligible requests); `Err` carries a user-facing message and guarantees
/// no state mutation occurred.
pub fn execute_command(
    state: &mut WorldState,
    actor: &str,
    cmd: &Command,
    config: &SimConfig,
    rng: &mut StdRng,
) -> Result<bool, CommandError> {
    match cmd {
        Command::DeclareWar { target } => {
            let declared = registry::declare_war(state, actor, target).is_some();
            if declared {
                coalition::maybe_invoke_article_five(state, actor, target, config);
            }
            Ok(declared)
        }
        Command::MakePeace { target } => Ok(registry::make_peace(state, actor, target)),
        Command::ProposeAgreement { target, kind } => Ok(diplomacy::propose_agreement(
            state, actor, target, *kind, rng,
        )
        .unwrap_or(false)),
        Command::BreakAgreement { target, agreement } => {
            Ok(diplomacy::break_agreement(state, actor, target, *agreement))
        }
        Command::SetTariff { target, level } => {
            Ok(diplomacy::set_tariff(state, actor, target, *level))
        }
        Command::Covert { target, op } => {
            covert::execute_covert(state, actor, target, *op, config, rng)
        }
        Command::Influence { target, action } => {
            influence::execute_influence(state, actor, target, *action, config)
        }
        Command::ProposeResolution {
            title,
            kind,
            vetoable,
        } => Ok(
            resolutions::propose_resolution(state, actor, title, kind.clone(), *vetoable)
                .is_some(),
        ),
        Command::CastVote { resolution, vote } => {
            Ok(resolutions::cast_vote(state, *resolution, actor, *vote))
        }
        Command::RespondToCrisis { crisis: id, action } => {
            Ok(crisis::respond(state, *id, actor, *action))
        }
        Command::ProposeSummit { target, topics } => {
            Ok(summit::propose_summit(state, actor, target, topics.clone()).is_some())
        }
        Command::RespondToSummit { summit: id, accept } => {
            Ok(summit::respond_summit(state, *id, *accept, rng))
        }
        Command::CreateCoalition {
            name,
            kind,
            invitees,
            requirements,
        } => Ok(coalition::create_coalition(
            state,
            actor,
            name,
            *kind,
            invitees,
            requirements.clone(),
        )
        .is_some()),
        Command::JoinCoalition { coalition: id } => {
            Ok(coalition::join_coalition(state, *id, actor))
        }
        Command::LeaveCoalition { coalition: id } => {
            Ok(coalition::leave_coalition(state, *id, actor))
        }
        Command::InviteToCoalition {
            coalition: id,
            target,
        } => Ok(coalition::invite_to_coalition(state, *id, target)),
        Command::KickFromCoalition {
            coalition: id,
            target,
        } => Ok(coalition::kick_from_coalition(state, *id, actor, target)),
        Command::Pass => Ok(true),
    }
}

/// Merge deferred geometry completions back into the registry. A `None`
/// from the provider means no territory changes hands; the triggering
/// battle's outcome already stands.
pub fn drain_deferred(state: &mut WorldState, geometry: &dyn GeometryProvider) {
    for effect in state.deferred.take_all() {
        match effect {
            DeferredEffect::ApplyConquest {
                winner,
                loser,
                decisiveness,
                plan,
                location,
            } => {
                let claim = state.nations.get(&winner).and_then(|n| n.territory);
                let request = ConquestRequest {
                    winner: winner.clone(),
                    loser: loser.clone(),
                    decisiveness,
                    claim,
                    plan,
                    location,
                };
                match geometry.calculate_conquest(&request) {
                    Some(region) => {
                        let merged = match claim {
                            Some(existing) => geometry
                                .merge_territory(existing, region)
                                .unwrap_or(existing),
                            None => region,
                        };
                        if let Some(nation) = state.nations.get_mut(&winner) {
                            nation.territory = Some(merged);
                        }
                        let date = state.date;
                        let tick = state.tick;
                        state.events.push(
                            crate::events::EventKind::TerritoryCeded,
                            2,
                            format!("{loser} cedes territory to {winner}"),
                            String::new(),
                            vec![winner.clone(), loser.clone()],
                            date,
                            tick,
                        );
                    }
                    None => {
                        log::debug!(
                            "[GEO] no conquest region for {} vs {}, occupation stands",
                            winner,
                            loser
                        );
                    }
                }
            }
            DeferredEffect::MergeAnnexedTerritory { annexer, annexed } => {
                let a = state.nations.get(&annexer).and_then(|n| n.territory);
                let b = state.nations.get(&annexed).and_then(|n| n.territory);
                if let (Some(a), Some(b)) = (a, b) {
                    if let Some(merged) = geometry.merge_territory(a, b) {
                        if let Some(nation) = state.nations.get_mut(&annexer) {
                            nation.territory = Some(merged);
                        }
                        if let Some(nation) = state.nations.get_mut(&annexed) {
                            nation.territory = None;
                        }
                    }
                }
            }
            DeferredEffect::RestoreTerritory { liberated, from } => {
                let occupier = state.nations.get(&from).and_then(|n| n.territory);
                let original = state.nations.get(&liberated).and_then(|n| n.territory);
                if let (Some(occupier_region), Some(original_region)) = (occupier, original) {
                    if let Some(reduced) =
                        geometry.subtract_territory(occupier_region, original_region)
                    {
                        if let Some(nation) = state.nations.get_mut(&from) {
                            nation.territory = Some(reduced);
                        }
                    }
                }
            }
        }
    }
}
