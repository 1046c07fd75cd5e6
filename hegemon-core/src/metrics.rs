use serde::{Deserialize, Serialize};

use crate::events::{EventKind, EventLog};

/// Accumulated simulation statistics, derived from the event log so the
/// systems themselves stay free of bookkeeping.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct SimMetrics {
    pub wars_declared: u64,
    pub battles_fought: u64,
    pub annexations: u64,
    pub agreements_signed: u64,
    pub resolutions_passed: u64,
    pub crises_opened: u64,
    pub article_five_invocations: u64,
    pub events_total: u64,
}

impl SimMetrics {
    pub fn from_events(log: &EventLog) -> Self {
        let mut metrics = Self {
            events_total: log.len() as u64,
            ..Default::default()
        };
        for event in log.iter() {
            match event.kind {
                EventKind::WarDeclared => metrics.wars_declared += 1,
                EventKind::BattleFought => metrics.battles_fought += 1,
                EventKind::Annexation => metrics.annexations += 1,
                EventKind::AgreementSigned => metrics.agreements_signed += 1,
                EventKind::ResolutionPassed => metrics.resolutions_passed += 1,
                EventKind::CrisisOpened => metrics.crises_opened += 1,
                EventKind::ArticleFiveInvoked => metrics.article_five_invocations += 1,
                _ => {}
            }
        }
        metrics
    }
}
