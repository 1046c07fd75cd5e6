//! Append-only diplomatic event log.
//!
//! Every notable outcome in the core (war declarations, annexations,
//! Article-5 invocations, resolution results, ...) is recorded as an
//! immutable timestamped event. Presentation layers consume the log as a
//! stream; ordering within a tick is insertion order. Events are never
//! mutated or replayed.
//!
//! Serialized with serde's tag format for clean JSONL output:
//! ```json
//! {"kind":"war_declared","id":17,"severity":3,...}
//! ```

use crate::state::{Code, Date};
use serde::{Deserialize, Serialize};

pub type EventId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    WarDeclared,
    PeaceMade,
    ForcedPeace,
    BattleFought,
    TerritoryCeded,
    Annexation,
    Liberation,
    AgreementSigned,
    AgreementRejected,
    AgreementBroken,
    TariffChanged,
    CovertAction,
    InfluenceAction,
    CoalitionFormed,
    CoalitionDissolved,
    CoalitionJoined,
    CoalitionLeft,
    ArticleFiveInvoked,
    CoalitionWarResolved,
    ResolutionProposed,
    ResolutionPassed,
    ResolutionFailed,
    ResolutionVetoed,
    CrisisOpened,
    CrisisAdvanced,
    CrisisResolved,
    SummitConcluded,
    TerritoryDemanded,
}

/// Immutable record of a diplomatic development.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomaticEvent {
    pub id: EventId,
    pub kind: EventKind,
    /// 1 (minor) to 3 (world-shaking).
    pub severity: u8,
    pub title: String,
    pub description: String,
    pub affected: Vec<Code>,
    pub date: Date,
    pub tick: u64,
}

/// Insertion-ordered, append-only sequence of diplomatic events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<DiplomaticEvent>,
    next_id: EventId,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        kind: EventKind,
        severity: u8,
        title: impl Into<String>,
        description: impl Into<String>,
        affected: Vec<Code>,
        date: Date,
        tick: u64,
    ) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(DiplomaticEvent {
            id,
            kind,
            severity: severity.clamp(1, 3),
            title: title.into(),
            description: description.into(),
            affected,
            date,
            tick,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiplomaticEvent> {
        self.entries.iter()
    }

    /// Entries appended at or after the given index; the driver tracks its
    /// own cursor to stream new events between ticks.
    pub fn since(&self, index: usize) -> &[DiplomaticEvent] {
        &self.entries[index.min(self.entries.len())..]
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &DiplomaticEvent> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_monotonic_ids() {
        let mut log = EventLog::new();
        let a = log.push(
            EventKind::WarDeclared,
            3,
            "War",
            "A attacks B",
            vec!["A".into(), "B".into()],
            Date::new(2020, 1),
            0,
        );
        let b = log.push(
            EventKind::PeaceMade,
            2,
            "Peace",
            "A and B make peace",
            vec!["A".into(), "B".into()],
            Date::new(2020, 5),
            4,
        );
        assert!(b > a);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_severity_clamped() {
        let mut log = EventLog::new();
        log.push(
            EventKind::TariffChanged,
            9,
            "Tariff",
            "",
            vec![],
            Date::default(),
            0,
        );
        assert_eq!(log.iter().next().unwrap().severity, 3);
    }

    #[test]
    fn test_since_cursor() {
        let mut log = EventLog::new();
        for i in 0..5 {
            log.push(
                EventKind::BattleFought,
                2,
                format!("Battle {i}"),
                "",
                vec![],
                Date::default(),
                i,
            );
        }
        assert_eq!(log.since(3).len(), 2);
        assert_eq!(log.since(99).len(), 0);
    }

    #[test]
    fn test_jsonl_shape() {
        let mut log = EventLog::new();
        log.push(
            EventKind::ArticleFiveInvoked,
            3,
            "Article 5",
            "Northern Pact mobilizes",
            vec!["NOR".into()],
            Date::new(2021, 3),
            14,
        );
        let line = serde_json::to_string(log.iter().next().unwrap()).unwrap();
        assert!(line.contains("\"kind\":\"article_five_invoked\""));
        assert!(line.contains("\"severity\":3"));
    }
}
