use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::analytics::ReportContext;
use crate::domain::{AlertRecord, Team};

pub fn demo_teams() -> Vec<Team> {
    vec![
        Team::new("team-sre", "SRE"),
        Team::new("team-payments", "Payments"),
        Team::new("team-search", "Search"),
    ]
}

/// Sanitized, deterministic alert set covering January 2026.
///
/// Every fifth alert has only a user responder and every seventh points at a team id that
/// `demo_teams` does not know, so "Unknown" attribution shows up in responder views.
pub fn demo_alerts() -> Vec<AlertRecord> {
    let base: OffsetDateTime = datetime!(2026-01-01 00:00 UTC);
    let priorities = ["P1", "P2", "P3", "P4", "P5", "P3"];
    let teams = ["team-sre", "team-payments", "team-search"];

    (0..40i64)
        .map(|i| {
            // Two alerts a day, one at 03:xx and one at 14:xx.
            let created = base + Duration::hours((i / 2) * 24 + if i % 2 == 0 { 3 } else { 14 })
                + Duration::minutes(i % 60);
            let updated = created + Duration::minutes(10 + 5 * (i % 6));
            let priority = priorities[(i as usize) % priorities.len()];
            let alert = AlertRecord::new(format!("alert-{i:03}"), created, updated, priority);

            if i % 5 == 0 {
                alert.with_responder("user", "user-oncall")
            } else if i % 7 == 0 {
                alert.with_responder("team", "team-retired")
            } else {
                alert
                    .with_responder("escalation", "esc-default")
                    .with_responder("team", teams[(i as usize) % teams.len()])
            }
        })
        .collect()
}

pub fn demo_context() -> ReportContext {
    ReportContext::new(
        datetime!(2026-01-01 00:00 UTC),
        datetime!(2026-01-31 23:59 UTC),
        demo_alerts(),
        demo_teams(),
    )
}
