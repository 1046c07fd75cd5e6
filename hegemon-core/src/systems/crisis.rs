//! Bilateral crises.
//!
//! A crisis moves through strictly ordinal phases
//! (incident → demands → ultimatum → mobilization → war), advanced one step
//! at a time by participant actions. Each phase narrows the action set;
//! phase 5 is reachable only through escalation and opens a war between the
//! participants.

use crate::config::SimConfig;
use crate::events::EventKind;
use crate::registry::{actionable, adjust_standing, declare_war};
use crate::state::{
    Crisis, CrisisAction, CrisisId, CrisisOutcome, CrisisPhase, Modifier, SummitTopic, WorldState,
};
use crate::systems::summit::propose_summit;

/// Actions still on the table at a given phase.
pub fn available_actions(phase: CrisisPhase) -> &'static [CrisisAction] {
    match phase {
        CrisisPhase::Incident => &[
            CrisisAction::BackDown,
            CrisisAction::HoldFirm,
            CrisisAction::Escalate,
            CrisisAction::SeekMediation,
            CrisisAction::ProposeSummit,
        ],
        CrisisPhase::Demands => &[
            CrisisAction::BackDown,
            CrisisAction::HoldFirm,
            CrisisAction::Escalate,
            CrisisAction::SeekMediation,
        ],
        CrisisPhase::Ultimatum => &[
            CrisisAction::BackDown,
            CrisisAction::HoldFirm,
            CrisisAction::Escalate,
        ],
        CrisisPhase::Mobilization => &[CrisisAction::BackDown, CrisisAction::Escalate],
        CrisisPhase::War => &[],
    }
}

/// Open a crisis at phase 1.
pub fn open_crisis(state: &mut WorldState, instigator: &str, respondent: &str) -> Option<CrisisId> {
    if instigator == respondent
        || !actionable(state, instigator)
        || !actionable(state, respondent)
    {
        return None;
    }

    let id = state.next_crisis_id;
    state.next_crisis_id += 1;
    state.crises.insert(
        id,
        Crisis {
            id,
            instigator: instigator.to_string(),
            respondent: respondent.to_string(),
            phase: CrisisPhase::Incident,
            opened_tick: state.tick,
            last_action_tick: state.tick,
            outcome: None,
        },
    );

    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::CrisisOpened,
        2,
        format!("Crisis between {instigator} and {respondent}"),
        "A diplomatic incident has sparked an international crisis.".to_string(),
        vec![instigator.to_string(), respondent.to_string()],
        date,
        tick,
    );
    Some(id)
}

/// A participant responds to the crisis. Returns `false` for unknown
/// crises, non-participants, resolved crises, or actions not available at
/// the current phase.
pub fn respond(
    state: &mut WorldState,
    id: CrisisId,
    actor: &str,
    action: CrisisAction,
) -> bool {
    let Some(crisis) = state.crises.get(&id) else {
        return false;
    };
    if crisis.outcome.is_some()
        || (crisis.instigator != actor && crisis.respondent != actor)
        || !available_actions(crisis.phase).contains(&action)
    {
        return false;
    }

    let instigator = crisis.instigator.clone();
    let respondent = crisis.respondent.clone();
    let other = if actor == instigator {
        respondent.clone()
    } else {
        instigator.clone()
    };
    let phase = crisis.phase;

    match action {
        CrisisAction::Escalate => {
            // The only path upward; phases are never skipped.
            if let Some(next) = phase.next() {
                set_phase(state, id, next);
                if next == CrisisPhase::War {
                    resolve(state, id, CrisisOutcome::War);
                    let _ = declare_war(state, &instigator, &respondent);
                }
            }
        }
        CrisisAction::BackDown => {
            // Folding late is a public humiliation.
            if phase >= CrisisPhase::Ultimatum {
                if let Some(nation) = state.nations.get_mut(actor) {
                    nation.modifiers.insert(Modifier::Humiliated);
                    nation.authority.add(-10);
                }
            }
            adjust_standing(state, actor, &other, 10);
            resolve(state, id, CrisisOutcome::Defused);
        }
        CrisisAction::HoldFirm => {
            adjust_standing(state, actor, &other, -5);
            touch(state, id);
        }
        CrisisAction::SeekMediation => {
            if let Some(prev) = phase.prev() {
                set_phase(state, id, prev);
            } else {
                resolve(state, id, CrisisOutcome::Defused);
            }
        }
        CrisisAction::ProposeSummit => {
            let _ = propose_summit(
                state,
                actor,
                &other,
                vec![SummitTopic::BorderAssurances, SummitTopic::TradeTerms],
            );
            resolve(state, id, CrisisOutcome::Defused);
        }
    }

    true
}

/// Monthly consumption: crises nobody is feeding cool down one phase, and
/// defuse entirely from phase 1.
pub fn run_crisis_tick(state: &mut WorldState, config: &SimConfig) {
    let mut ids: Vec<CrisisId> = state
        .crises
        .values()
        .filter(|c| c.outcome.is_none())
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();

    for id in ids {
        let stale = state
            .crises
            .get(&id)
            .map(|c| state.tick >= c.last_action_tick + config.crisis_stale_after)
            .unwrap_or(false);
        if !stale {
            continue;
        }

        let phase = state.crises[&id].phase;
        match phase.prev() {
            Some(prev) => set_phase(state, id, prev),
            None => resolve(state, id, CrisisOutcome::Defused),
        }
    }

    // Resolved crises stay in the map one tick for observers, then drop.
    let tick = state.tick;
    state
        .crises
        .retain(|_, c| c.outcome.is_none() || c.last_action_tick + 1 >= tick);
}

fn set_phase(state: &mut WorldState, id: CrisisId, phase: CrisisPhase) {
    let tick = state.tick;
    let date = state.date;
    let (instigator, respondent) = {
        let Some(crisis) = state.crises.get_mut(&id) else {
            return;
        };
        crisis.phase = phase;
        crisis.last_action_tick = tick;
        (crisis.instigator.clone(), crisis.respondent.clone())
    };
    state.events.push(
        EventKind::CrisisAdvanced,
        2,
        format!(
            "Crisis between {instigator} and {respondent} at phase {}",
            phase.ordinal()
        ),
        String::new(),
        vec![instigator, respondent],
        date,
        tick,
    );
}

fn touch(state: &mut WorldState, id: CrisisId) {
    let tick = state.tick;
    if let Some(crisis) = state.crises.get_mut(&id) {
        crisis.last_action_tick = tick;
    }
}

fn resolve(state: &mut WorldState, id: CrisisId, outcome: CrisisOutcome) {
    let tick = state.tick;
    let date = state.date;
    let (instigator, respondent) = {
        let Some(crisis) = state.crises.get_mut(&id) else {
            return;
        };
        crisis.outcome = Some(outcome);
        crisis.last_action_tick = tick;
        (crisis.instigator.clone(), crisis.respondent.clone())
    };
    let severity = match outcome {
        CrisisOutcome::War => 3,
        CrisisOutcome::Defused => 1,
    };
    state.events.push(
        EventKind::CrisisResolved,
        severity,
        format!("Crisis between {instigator} and {respondent} resolved: {outcome:?}"),
        String::new(),
        vec![instigator, respondent],
        date,
        tick,
    );
}
