//! Coalitions and collective defense.
//!
//! Named alliances with typed membership rules, and the Article-5 protocol
//! that cascades a single war declaration into a multi-party conflict.
//! Shared coalition membership is an absolute veto on that pair ever
//! becoming AI-vs-AI war rivals.

use crate::config::SimConfig;
use crate::events::EventKind;
use crate::registry::{actionable, declare_war, make_peace, update_relations};
use crate::state::{
    Coalition, CoalitionId, CoalitionKind, CoalitionWar, CoalitionWarId, CoalitionWarStatus,
    MembershipRequirements, WorldState,
};

/// A coalition below this many members is dissolved.
const MIN_MEMBERS: usize = 2;

/// Check a nation against a coalition's membership gate.
pub fn is_eligible(
    state: &WorldState,
    leader: &str,
    kind: CoalitionKind,
    requirements: Option<&MembershipRequirements>,
    code: &str,
) -> bool {
    let Some(nation) = state.nations.get(code) else {
        return false;
    };
    if nation.is_annexed {
        return false;
    }
    let Some(reqs) = requirements else {
        return true;
    };

    if let Some(religion) = &reqs.religion {
        if &nation.religion != religion {
            return false;
        }
    }
    if let Some(culture) = &reqs.culture {
        if &nation.culture != culture {
            return false;
        }
    }
    if let Some(min) = reqs.min_relations {
        if state.standing(code, leader) < min {
            return false;
        }
    }
    // Kind-specific thresholds.
    match kind {
        CoalitionKind::Military => {
            if let Some(min) = reqs.min_soldiers {
                if nation.soldiers < min {
                    return false;
                }
            }
        }
        CoalitionKind::Trade => {
            if let Some(min) = reqs.min_economy {
                if nation.economy.get() < min {
                    return false;
                }
            }
        }
        CoalitionKind::Research => {
            if let Some(min) = reqs.min_research {
                if nation.research_level < min {
                    return false;
                }
            }
        }
    }

    true
}

/// Found a coalition. Eligible invitees on decent terms with the founder
/// join immediately; creation fails without at least one of them.
pub fn create_coalition(
    state: &mut WorldState,
    founder: &str,
    name: &str,
    kind: CoalitionKind,
    invitees: &[String],
    requirements: Option<MembershipRequirements>,
) -> Option<CoalitionId> {
    if !actionable(state, founder) {
        return None;
    }

    let mut members = vec![founder.to_string()];
    for invitee in invitees {
        if invitee == founder || members.contains(invitee) {
            continue;
        }
        if is_eligible(state, founder, kind, requirements.as_ref(), invitee)
            && state.standing(founder, invitee) > 0
        {
            members.push(invitee.clone());
        }
    }

    if members.len() < MIN_MEMBERS {
        return None;
    }

    let id = state.next_coalition_id;
    state.next_coalition_id += 1;
    state.coalitions.insert(
        id,
        Coalition {
            id,
            name: name.to_string(),
            kind,
            leader: founder.to_string(),
            members: members.clone(),
            requirements,
            founded: state.date,
        },
    );

    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::CoalitionFormed,
        2,
        format!("{name} founded"),
        format!("{} nations band together under {name}.", members.len()),
        members,
        date,
        tick,
    );

    log::info!("[COALITION] {} founded by {}", name, founder);
    Some(id)
}

/// Join an existing coalition, subject to its membership gate.
pub fn join_coalition(state: &mut WorldState, coalition: CoalitionId, code: &str) -> bool {
    let Some(c) = state.coalitions.get(&coalition) else {
        return false;
    };
    if c.is_member(code) {
        return false;
    }
    let (leader, kind, reqs) = (c.leader.clone(), c.kind, c.requirements.clone());
    if !is_eligible(state, &leader, kind, reqs.as_ref(), code) {
        return false;
    }

    let name = state.coalitions[&coalition].name.clone();
    state
        .coalitions
        .get_mut(&coalition)
        .expect("checked above")
        .members
        .push(code.to_string());

    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::CoalitionJoined,
        1,
        format!("{code} joins {name}"),
        String::new(),
        vec![code.to_string()],
        date,
        tick,
    );
    true
}

/// Leave a coalition voluntarily.
pub fn leave_coalition(state: &mut WorldState, coalition: CoalitionId, code: &str) -> bool {
    let Some(c) = state.coalitions.get_mut(&coalition) else {
        return false;
    };
    let before = c.members.len();
    c.members.retain(|m| m != code);
    if c.members.len() == before {
        return false;
    }
    // A departing leader hands the chair to the senior member.
    if c.leader == code {
        if let Some(next) = c.members.first() {
            c.leader = next.clone();
        }
    }
    let name = c.name.clone();

    let date = state.date;
    let tick = state.tick;
    state.events.push(
        EventKind::CoalitionLeft,
        1,
        format!("{code} leaves {name}"),
        String::new(),
        vec![code.to_string()],
        date,
        tick,
    );
    true
}

/// Invite a nation; AI invitees accept when eligible and on decent terms
/// with the leader.
pub fn invite_to_coalition(
    state: &mut WorldState,
    coalition: CoalitionId,
    target: &str,
) -> bool {
    let Some(c) = state.coalitions.get(&coalition) else {
        return false;
    };
    let leader = c.leader.clone();
    if state.standing(&leader, target) <= 0 {
        return false;
    }
    join_coalition(state, coalition, target)
}

/// The leader expels a member.
pub fn kick_from_coalition(
    state: &mut WorldState,
    coalition: CoalitionId,
    actor: &str,
    target: &str,
) -> bool {
    let Some(c) = state.coalitions.get(&coalition) else {
        return false;
    };
    if c.leader != actor || actor == target {
        return false;
    }
    leave_coalition(state, coalition, target)
}

/// The Article-5 protocol. Invoked whenever a military-coalition member is
/// attacked:
///
/// 1. find the defender's military coalition;
/// 2. mobilize 10% of the combined soldiers of every other living member
///    as a reinforcement pool for the defender;
/// 3. each contributing ally declares war on the aggressor (or turns
///    hostile, if the aggressor is the player) unless already at war;
/// 4. open a coalition war record tracking the cascade;
/// 5. emit a severity-3 event naming the coalition.
pub fn maybe_invoke_article_five(
    state: &mut WorldState,
    aggressor: &str,
    defender: &str,
    config: &SimConfig,
) -> Option<CoalitionWarId> {
    let coalition = state.military_coalition_of(defender)?;
    if coalition.is_member(aggressor) {
        // Intra-coalition attacks never trigger the pact against itself.
        return None;
    }
    let coalition_id = coalition.id;
    let coalition_name = coalition.name.clone();

    // 1-2. Reinforcement pool: 10% of each contributing ally's soldiers.
    let contributors: Vec<String> = state.coalitions[&coalition_id]
        .members
        .iter()
        .filter(|m| m.as_str() != defender && m.as_str() != aggressor)
        .filter(|m| {
            state
                .nations
                .get(m.as_str())
                .map(|n| !n.is_annexed)
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    if contributors.is_empty() {
        return None;
    }

    let mut pool: u32 = 0;
    for member in &contributors {
        if let Some(nation) = state.nations.get_mut(member) {
            let contribution = (nation.soldiers as f64 * config.reinforcement_share) as u32;
            nation.soldiers -= contribution;
            pool += contribution;
        }
    }
    if let Some(nation) = state.nations.get_mut(defender) {
        nation.soldiers += pool;
    }

    // 3. Every contributor enters the conflict.
    let player = state.player.clone();
    for member in &contributors {
        if aggressor == player {
            // Against the player the pact answers with hostility, not war.
            let current = state
                .nations
                .get(member)
                .map(|n| n.relations.get())
                .unwrap_or(0);
            if current > -30 {
                update_relations(state, member, -30 - current);
            }
        } else if !state.are_at_war(member, aggressor) {
            let _ = declare_war(state, member, aggressor);
        }
    }

    // 4. Track the cascade as a unit.
    let id = state.next_coalition_war_id;
    state.next_coalition_war_id += 1;
    let baseline = state
        .nations
        .get(aggressor)
        .map(|n| n.territory_lost.get())
        .unwrap_or(0);
    state.coalition_wars.insert(
        id,
        CoalitionWar {
            id,
            coalition: coalition_id,
            aggressor: aggressor.to_string(),
            defender: defender.to_string(),
            mobilized: contributors.clone(),
            casualties: 0,
            aggressor_territory_baseline: baseline,
            status: CoalitionWarStatus::Active,
            start_tick: state.tick,
        },
    );

    // 5. Let the world know.
    let date = state.date;
    let tick = state.tick;
    let mut affected = vec![aggressor.to_string(), defender.to_string()];
    affected.extend(contributors);
    state.events.push(
        EventKind::ArticleFiveInvoked,
        3,
        format!("{coalition_name} invokes Article 5"),
        format!(
            "{coalition_name} mobilizes {pool} reinforcements in defense of {defender}."
        ),
        affected,
        date,
        tick,
    );

    log::info!(
        "[ARTICLE5] {} mobilizes against {} (pool {})",
        coalition_name,
        aggressor,
        pool
    );
    Some(id)
}

/// Monthly coalition upkeep: dissolve sub-minimum coalitions and resolve
/// coalition wars that have reached a terminal condition.
pub fn run_coalition_tick(state: &mut WorldState, config: &SimConfig) {
    dissolve_small_coalitions(state);
    resolve_coalition_wars(state, config);
}

pub(crate) fn dissolve_small_coalitions(state: &mut WorldState) {
    let doomed: Vec<CoalitionId> = state
        .coalitions
        .values()
        .filter(|c| c.members.len() < MIN_MEMBERS)
        .map(|c| c.id)
        .collect();

    for id in doomed {
        if let Some(coalition) = state.coalitions.remove(&id) {
            let date = state.date;
            let tick = state.tick;
            state.events.push(
                EventKind::CoalitionDissolved,
                1,
                format!("{} dissolved", coalition.name),
                String::new(),
                coalition.members,
                date,
                tick,
            );
            log::info!("[COALITION] {} dissolved", coalition.name);
        }
    }
}

fn resolve_coalition_wars(state: &mut WorldState, config: &SimConfig) {
    let mut ids: Vec<CoalitionWarId> = state
        .coalition_wars
        .values()
        .filter(|w| w.status == CoalitionWarStatus::Active)
        .map(|w| w.id)
        .collect();
    ids.sort_unstable();

    for id in ids {
        let (aggressor, defender, mobilized, start_tick) = {
            let w = &state.coalition_wars[&id];
            (
                w.aggressor.clone(),
                w.defender.clone(),
                w.mobilized.clone(),
                w.start_tick,
            )
        };

        let aggressor_annexed = state
            .nations
            .get(&aggressor)
            .map(|n| n.is_annexed)
            .unwrap_or(true);
        let aggressor_territory = state
            .nations
            .get(&aggressor)
            .map(|n| n.territory_lost.get())
            .unwrap_or(100);
        let defender_annexed = state
            .nations
            .get(&defender)
            .map(|n| n.is_annexed)
            .unwrap_or(true);

        let status = if aggressor_annexed
            || aggressor_territory >= config.coalition_victory_territory
        {
            Some(CoalitionWarStatus::Victory)
        } else if defender_annexed {
            Some(CoalitionWarStatus::Defeat)
        } else if state.tick >= start_tick + config.coalition_war_timeout {
            Some(CoalitionWarStatus::Peace)
        } else {
            None
        };

        let Some(status) = status else {
            continue;
        };

        if let Some(war) = state.coalition_wars.get_mut(&id) {
            war.status = status;
        }

        // A settled cascade ends every member's war with the aggressor.
        for member in mobilized.iter().chain(std::iter::once(&defender)) {
            if state.are_at_war(member, &aggressor) {
                make_peace(state, member, &aggressor);
            }
        }

        let date = state.date;
        let tick = state.tick;
        state.events.push(
            EventKind::CoalitionWarResolved,
            2,
            format!(
                "Coalition war against {aggressor} ends in {status:?}"
            ),
            String::new(),
            vec![aggressor.clone(), defender.clone()],
            date,
            tick,
        );
    }
}
