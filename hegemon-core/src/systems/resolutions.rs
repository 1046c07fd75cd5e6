//! UN resolutions.
//!
//! A resolution opens for voting, collects YES/NO/ABSTAIN ballots, and
//! resolves against a pass threshold, with an optional Security-Council
//! veto gate. Voting is out-of-band; the orchestrator tallies once per
//! simulated month.

use rand::Rng;

use crate::config::SimConfig;
use crate::events::EventKind;
use crate::registry::{actionable, adjust_standing, make_peace};
use crate::state::{
    Modifier, Resolution, ResolutionId, ResolutionKind, ResolutionStatus, Vote, WorldState,
};

/// Open a resolution for voting.
pub fn propose_resolution(
    state: &mut WorldState,
    proposer: &str,
    title: &str,
    kind: ResolutionKind,
    vetoable: bool,
) -> Option<ResolutionId> {
    if !actionable(state, proposer) {
        return None;
    }

    let id = state.next_resolution_id;
    state.next_resolution_id += 1;
    state.resolutions.insert(
        id,
        Resolution {
            id,
            title: title.to_string(),
            kind,
            proposer: proposer.to_string(),
            votes: Default::default(),
            vetoable,
            status: ResolutionStatus::Open,
            opened_tick: state.tick,
        },
    );

    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::ResolutionProposed,
        1,
        format!("Resolution proposed: {title}"),
        String::new(),
        vec![proposer.to_string()],
        date,
        tick,
    );
    Some(id)
}

/// Record a ballot on an open resolution.
pub fn cast_vote(state: &mut WorldState, resolution: ResolutionId, voter: &str, vote: Vote) -> bool {
    if !actionable(state, voter) {
        return false;
    }
    match state.resolutions.get_mut(&resolution) {
        Some(r) if r.status == ResolutionStatus::Open => {
            r.votes.insert(voter.to_string(), vote);
            true
        }
        _ => false,
    }
}

/// Monthly consumption: auto-vote for AI members that have not voted, then
/// tally every resolution whose voting window has closed.
pub fn run_resolution_tick(state: &mut WorldState, config: &SimConfig, rng: &mut impl Rng) {
    let mut ids: Vec<ResolutionId> = state
        .resolutions
        .values()
        .filter(|r| r.status == ResolutionStatus::Open)
        .map(|r| r.id)
        .collect();
    ids.sort_unstable();

    for id in ids {
        auto_vote(state, id, rng);

        let due = state
            .resolutions
            .get(&id)
            .map(|r| state.tick >= r.opened_tick + config.resolution_voting_window)
            .unwrap_or(false);
        if due {
            tally(state, id, config);
        }
    }
}

fn auto_vote(state: &mut WorldState, id: ResolutionId, rng: &mut impl Rng) {
    let Some(resolution) = state.resolutions.get(&id) else {
        return;
    };
    let proposer = resolution.proposer.clone();
    let target = resolution_target(&resolution.kind);

    let codes = state.sorted_codes();
    for code in codes {
        let nation = &state.nations[&code];
        if nation.is_annexed || nation.is_player || code == proposer {
            continue;
        }
        if state.resolutions[&id].votes.contains_key(&code) {
            continue;
        }

        let vote = if target.as_deref() == Some(code.as_str()) {
            Vote::No
        } else {
            let standing = state.standing(&code, &proposer);
            if standing > 20 {
                Vote::Yes
            } else if standing < -20 {
                Vote::No
            } else if rng.gen::<f64>() < 0.5 {
                Vote::Yes
            } else {
                Vote::Abstain
            }
        };

        if let Some(resolution) = state.resolutions.get_mut(&id) {
            resolution.votes.insert(code, vote);
        }
    }
}

fn resolution_target(kind: &ResolutionKind) -> Option<String> {
    match kind {
        ResolutionKind::Sanction { target }
        | ResolutionKind::Condemn { target }
        | ResolutionKind::AidPackage { target } => Some(target.clone()),
        ResolutionKind::Ceasefire { .. } => None,
    }
}

fn tally(state: &mut WorldState, id: ResolutionId, config: &SimConfig) {
    let Some(resolution) = state.resolutions.get(&id) else {
        return;
    };

    let yes = resolution.votes.values().filter(|v| **v == Vote::Yes).count();
    let no = resolution.votes.values().filter(|v| **v == Vote::No).count();

    // Security-Council veto gate: one permanent member voting NO sinks a
    // vetoable resolution regardless of the tally.
    let vetoed = resolution.vetoable
        && config.security_council.iter().any(|member| {
            resolution.votes.get(member) == Some(&Vote::No)
                && state
                    .nations
                    .get(member)
                    .map(|n| !n.is_annexed)
                    .unwrap_or(false)
        });

    let passed = !vetoed
        && yes + no > 0
        && (yes as f64 / (yes + no) as f64) >= config.resolution_pass_threshold;

    let title = resolution.title.clone();
    let kind = resolution.kind.clone();
    let proposer = resolution.proposer.clone();

    let (status, event_kind, severity) = if vetoed {
        (ResolutionStatus::Vetoed, EventKind::ResolutionVetoed, 2)
    } else if passed {
        (ResolutionStatus::Passed, EventKind::ResolutionPassed, 2)
    } else {
        (ResolutionStatus::Failed, EventKind::ResolutionFailed, 1)
    };

    if let Some(resolution) = state.resolutions.get_mut(&id) {
        resolution.status = status;
    }

    if passed {
        apply_effects(state, &proposer, &kind);
    }

    let date = state.date;
    let tick = state.tick;
    let mut affected = vec![proposer];
    if let Some(target) = resolution_target(&kind) {
        affected.push(target);
    }
    state.events.push(
        event_kind,
        severity,
        format!("Resolution {title}: {yes} for, {no} against"),
        String::new(),
        affected,
        date,
        tick,
    );

    log::debug!("[UN] resolution {} -> {:?}", title, status);
}

fn apply_effects(state: &mut WorldState, proposer: &str, kind: &ResolutionKind) {
    match kind {
        ResolutionKind::Sanction { target } => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.economy.add(-10);
                nation.modifiers.insert(Modifier::Sanctioned);
            }
            adjust_standing(state, proposer, target, -20);
        }
        ResolutionKind::Condemn { target } => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.authority.add(-5);
            }
            adjust_standing(state, proposer, target, -15);
        }
        ResolutionKind::AidPackage { target } => {
            if let Some(nation) = state.nations.get_mut(target) {
                nation.economy.add(10);
            }
            adjust_standing(state, proposer, target, 10);
        }
        ResolutionKind::Ceasefire { a, b } => {
            if state.are_at_war(a, b) {
                make_peace(state, a, b);
            }
        }
    }
}
