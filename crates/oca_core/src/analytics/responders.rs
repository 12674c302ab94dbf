use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AlertRecord, Team};

/// Name of the team responsible for `alert`.
///
/// Only the first team-typed responder is considered. When there is none, or its id is not in
/// `teams`, the alert is attributed to `unknown_label`.
pub fn resolve_responder(teams: &[Team], alert: &AlertRecord, unknown_label: &str) -> String {
    let Some(team_ref) = alert.responders.iter().find(|r| r.is_team()) else {
        return unknown_label.to_string();
    };
    teams
        .iter()
        .find(|t| t.id == team_ref.id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| unknown_label.to_string())
}

/// Fixed data point fields that a responder column must not shadow.
pub const RESERVED_COLUMNS: [&str; 3] = ["period", "total", "date"];

/// Column name for a responder in flattened data points.
///
/// A name equal to a fixed field gets a ` (team)` suffix so each record keeps unique keys.
pub fn responder_column(name: String) -> String {
    if RESERVED_COLUMNS.contains(&name.as_str()) {
        format!("{name} (team)")
    } else {
        name
    }
}

/// Per-period alert count, split by responder.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResponderCounts {
    pub total: u64,
    pub by_responder: BTreeMap<String, u64>,
}

impl ResponderCounts {
    pub fn record(&mut self, responder: &str) {
        *self.by_responder.entry(responder.to_string()).or_default() += 1;
        self.total += 1;
    }

    pub fn value_for(&self, responder: &str) -> u64 {
        self.by_responder.get(responder).copied().unwrap_or(0)
    }
}

/// Per-period impact durations in minutes, split by responder.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResponderDurations {
    pub durations: Vec<i64>,
    pub by_responder: BTreeMap<String, Vec<i64>>,
}

impl ResponderDurations {
    pub fn record(&mut self, responder: &str, minutes: i64) {
        self.by_responder
            .entry(responder.to_string())
            .or_default()
            .push(minutes);
        self.durations.push(minutes);
    }

    pub fn mean(&self) -> f64 {
        mean_minutes(&self.durations)
    }

    pub fn mean_for(&self, responder: &str) -> f64 {
        self.by_responder
            .get(responder)
            .map(|d| mean_minutes(d))
            .unwrap_or(0.0)
    }
}

/// Arithmetic mean; an empty list averages to zero.
pub fn mean_minutes(durations: &[i64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let sum: i64 = durations.iter().sum();
    sum as f64 / durations.len() as f64
}

/// Responder names seen anywhere in a run, in stable (sorted) order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResponderSet(BTreeSet<String>);

impl ResponderSet {
    pub fn insert(&mut self, name: &str) {
        if !self.0.contains(name) {
            self.0.insert(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}
