use crate::state::{
    AgreementId, AgreementKind, Code, CoalitionId, CoalitionKind, CrisisAction, CrisisId,
    MembershipRequirements, ResolutionId, ResolutionKind, SummitId, SummitTopic, Tariff, Vote,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInputs {
    pub nation: Code,
    pub commands: Vec<Command>,
}

/// Covert operations traded against the actor's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovertOp {
    Destabilize,
    FundSeparatists,
    PlantPropaganda,
}

/// Soft-power actions traded against influence points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceAction {
    CulturalExchange,
    EconomicAid,
    Espionage,
    BroadcastPropaganda,
}

/// The full command surface of the simulation core. Every direct instrument
/// invocation arrives here, whether issued by the outer game layer on the
/// player's behalf or by the AI strategy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum Command {
    // Military
    DeclareWar {
        target: Code,
    },
    MakePeace {
        target: Code,
    },

    // Bilateral diplomacy
    ProposeAgreement {
        target: Code,
        kind: AgreementKind,
    },
    BreakAgreement {
        target: Code,
        agreement: AgreementId,
    },
    SetTariff {
        target: Code,
        level: Tariff,
    },
    Covert {
        target: Code,
        op: CovertOp,
    },
    Influence {
        target: Code,
        action: InfluenceAction,
    },

    // United Nations
    ProposeResolution {
        title: String,
        kind: ResolutionKind,
        vetoable: bool,
    },
    CastVote {
        resolution: ResolutionId,
        vote: Vote,
    },

    // Crises & summits
    RespondToCrisis {
        crisis: CrisisId,
        action: CrisisAction,
    },
    ProposeSummit {
        target: Code,
        topics: Vec<SummitTopic>,
    },
    RespondToSummit {
        summit: SummitId,
        accept: bool,
    },

    // Coalitions
    CreateCoalition {
        name: String,
        kind: CoalitionKind,
        invitees: Vec<Code>,
        requirements: Option<MembershipRequirements>,
    },
    JoinCoalition {
        coalition: CoalitionId,
    },
    LeaveCoalition {
        coalition: CoalitionId,
    },
    InviteToCoalition {
        coalition: CoalitionId,
        target: Code,
    },
    KickFromCoalition {
        coalition: CoalitionId,
        target: Code,
    },

    // Meta
    Pass,
}
