use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::calendar::{weekday_name, weekdays_monday_first, Period};
use crate::config::{AnalyticsConfig, BusinessHours};
use crate::domain::{AlertRecord, Priority};

mod buckets;
pub mod context;
pub mod responders;

pub use context::{alert_window_query, ReportContext};
pub use responders::{mean_minutes, resolve_responder, responder_column};

use buckets::{Bucket, BucketSet};
use responders::{ResponderCounts, ResponderDurations, ResponderSet};

pub const ALERT_DASHBOARD_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourlyAlerts {
    pub hour: u8,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyAlerts {
    pub day: String,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyAlertsBySeverity {
    pub week: String,
    pub p1: u64,
    pub p2: u64,
    pub p3: u64,
    pub p4: u64,
    pub p5: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAlertsByHour {
    pub week: String,
    pub business_hours: u64,
    pub on_call_hours: u64,
    pub total: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// One chart point: a period, its total and one dense value per responder of the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponderDataPoint<V> {
    pub period: String,
    pub total: V,
    #[serde(flatten)]
    pub values: BTreeMap<String, V>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertsByResponders<V> {
    pub data_points: Vec<ResponderDataPoint<V>>,
    pub responders: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertDashboard {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub to: OffsetDateTime,
    pub alert_count: u64,
    pub business_hours: BusinessHours,
    pub by_hour: Vec<HourlyAlerts>,
    pub by_day: Vec<DailyAlerts>,
    pub by_week_and_severity: Vec<WeeklyAlertsBySeverity>,
    pub by_week_and_hours: Vec<WeeklyAlertsByHour>,
    pub by_day_and_responder: AlertsByResponders<u64>,
    pub by_week_and_responder: AlertsByResponders<u64>,
    pub by_month_and_responder: AlertsByResponders<u64>,
    pub by_quarter_and_responder: AlertsByResponders<u64>,
    pub impact_by_week_and_responder: AlertsByResponders<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SeverityCounts {
    p1: u64,
    p2: u64,
    p3: u64,
    p4: u64,
    p5: u64,
}

impl SeverityCounts {
    fn record(&mut self, priority: &Priority) {
        match priority {
            Priority::P1 => self.p1 += 1,
            Priority::P2 => self.p2 += 1,
            Priority::P3 => self.p3 += 1,
            Priority::P4 => self.p4 += 1,
            Priority::P5 => self.p5 += 1,
            Priority::Other(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HourClassCounts {
    business_hours: u64,
    on_call_hours: u64,
    total: u64,
}

/// Alert reporting over a [`ReportContext`].
///
/// Every view is a pure function of the context: periods are zero-filled across the whole range,
/// keyed by the alert's creation time in the context offset, and returned in ascending order.
#[derive(Debug, Clone, Default)]
pub struct AlertAnalytics {
    config: AnalyticsConfig,
}

impl AlertAnalytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn is_business_hours(&self, local: OffsetDateTime) -> bool {
        self.config.business_hours.contains(local.hour())
    }

    /// Always 24 points, hours 0 through 23.
    pub fn alerts_by_hour(&self, ctx: &ReportContext) -> Vec<HourlyAlerts> {
        let mut totals = [0u64; 24];
        for alert in &ctx.alerts {
            totals[usize::from(ctx.local(alert.created_at).hour())] += 1;
        }
        (0u8..)
            .zip(totals)
            .map(|(hour, total)| HourlyAlerts { hour, total })
            .collect()
    }

    /// Always 7 points, Monday through Sunday.
    pub fn alerts_by_day(&self, ctx: &ReportContext) -> Vec<DailyAlerts> {
        let mut totals = [0u64; 7];
        for alert in &ctx.alerts {
            let day = ctx.local(alert.created_at).weekday();
            totals[usize::from(day.number_days_from_monday())] += 1;
        }
        weekdays_monday_first()
            .into_iter()
            .zip(totals)
            .map(|(day, total)| DailyAlerts {
                day: weekday_name(day),
                total,
            })
            .collect()
    }

    pub fn alerts_by_week_and_severity(&self, ctx: &ReportContext) -> Vec<WeeklyAlertsBySeverity> {
        let mut buckets: BucketSet<SeverityCounts> = BucketSet::for_period(Period::IsoWeek, ctx);
        for alert in &ctx.alerts {
            let key = Period::IsoWeek.key(ctx.local(alert.created_at));
            if let Some(counts) = buckets.slot(&key) {
                counts.record(&alert.priority);
            }
        }
        buckets
            .into_sorted("week_and_severity")
            .into_iter()
            .map(|b| WeeklyAlertsBySeverity {
                week: b.key,
                p1: b.acc.p1,
                p2: b.acc.p2,
                p3: b.acc.p3,
                p4: b.acc.p4,
                p5: b.acc.p5,
                date: b.date,
            })
            .collect()
    }

    pub fn alerts_by_week_and_hours(&self, ctx: &ReportContext) -> Vec<WeeklyAlertsByHour> {
        let mut buckets: BucketSet<HourClassCounts> = BucketSet::for_period(Period::IsoWeek, ctx);
        for alert in &ctx.alerts {
            let created = ctx.local(alert.created_at);
            let business = self.is_business_hours(created);
            if let Some(counts) = buckets.slot(&Period::IsoWeek.key(created)) {
                counts.total += 1;
                if business {
                    counts.business_hours += 1;
                } else {
                    counts.on_call_hours += 1;
                }
            }
        }
        buckets
            .into_sorted("week_and_hours")
            .into_iter()
            .map(|b| WeeklyAlertsByHour {
                week: b.key,
                business_hours: b.acc.business_hours,
                on_call_hours: b.acc.on_call_hours,
                total: b.acc.total,
                date: b.date,
            })
            .collect()
    }

    pub fn alerts_by_day_and_responder(&self, ctx: &ReportContext) -> AlertsByResponders<u64> {
        self.count_by_responder(ctx, BucketSet::for_weekdays(ctx), "day_and_responder", |dt| {
            weekday_name(dt.weekday())
        })
    }

    pub fn alerts_by_week_and_responder(&self, ctx: &ReportContext) -> AlertsByResponders<u64> {
        self.count_by_period_and_responder(ctx, Period::IsoWeek, "week_and_responder")
    }

    pub fn alerts_by_month_and_responder(&self, ctx: &ReportContext) -> AlertsByResponders<u64> {
        self.count_by_period_and_responder(ctx, Period::Month, "month_and_responder")
    }

    pub fn alerts_by_quarter_and_responder(&self, ctx: &ReportContext) -> AlertsByResponders<u64> {
        self.count_by_period_and_responder(ctx, Period::Quarter, "quarter_and_responder")
    }

    /// Mean minutes from creation to last update, per ISO week and per responder.
    ///
    /// Negative spans (update before creation) count as zero minutes.
    pub fn impact_by_week_and_responder(&self, ctx: &ReportContext) -> AlertsByResponders<f64> {
        let mut buckets: BucketSet<ResponderDurations> =
            BucketSet::for_period(Period::IsoWeek, ctx);
        let mut responders = ResponderSet::default();

        for alert in &ctx.alerts {
            let responder = self.responder_of(ctx, alert);
            responders.insert(&responder);
            let minutes = (alert.updated_at - alert.created_at).whole_minutes().max(0);
            let key = Period::IsoWeek.key(ctx.local(alert.created_at));
            if let Some(acc) = buckets.slot(&key) {
                acc.record(&responder, minutes);
            }
        }

        let data_points = buckets
            .into_sorted("impact_by_week_and_responder")
            .into_iter()
            .map(|b| ResponderDataPoint {
                total: b.acc.mean(),
                values: responders
                    .iter()
                    .map(|r| (r.clone(), b.acc.mean_for(r)))
                    .collect(),
                period: b.key,
                date: b.date,
            })
            .collect();

        AlertsByResponders {
            data_points,
            responders: responders.into_vec(),
        }
    }

    /// Responder column for `alert`: the resolved team name, kept clear of the fixed fields.
    fn responder_of(&self, ctx: &ReportContext, alert: &AlertRecord) -> String {
        responder_column(resolve_responder(
            &ctx.teams,
            alert,
            &self.config.unknown_team_label,
        ))
    }

    fn count_by_period_and_responder(
        &self,
        ctx: &ReportContext,
        period: Period,
        view: &str,
    ) -> AlertsByResponders<u64> {
        self.count_by_responder(ctx, BucketSet::for_period(period, ctx), view, |dt| {
            period.key(dt)
        })
    }

    fn count_by_responder(
        &self,
        ctx: &ReportContext,
        mut buckets: BucketSet<ResponderCounts>,
        view: &str,
        key_of: impl Fn(OffsetDateTime) -> String,
    ) -> AlertsByResponders<u64> {
        let mut responders = ResponderSet::default();

        for alert in &ctx.alerts {
            let responder = self.responder_of(ctx, alert);
            // Seen responders get a column even if their alert falls outside the range.
            responders.insert(&responder);
            if let Some(counts) = buckets.slot(&key_of(ctx.local(alert.created_at))) {
                counts.record(&responder);
            }
        }

        let data_points = buckets
            .into_sorted(view)
            .into_iter()
            .map(|b: Bucket<ResponderCounts>| ResponderDataPoint {
                total: b.acc.total,
                values: responders
                    .iter()
                    .map(|r| (r.clone(), b.acc.value_for(r)))
                    .collect(),
                period: b.key,
                date: b.date,
            })
            .collect();

        AlertsByResponders {
            data_points,
            responders: responders.into_vec(),
        }
    }
}

/// Every view for one context, as rendered together on the analytics dashboard.
pub fn build_alert_dashboard(ctx: &ReportContext, config: &AnalyticsConfig) -> AlertDashboard {
    let analytics = AlertAnalytics::new(config.clone());
    AlertDashboard {
        version: ALERT_DASHBOARD_VERSION,
        from: ctx.local_from(),
        to: ctx.local_to(),
        alert_count: ctx.alerts.len() as u64,
        business_hours: config.business_hours,
        by_hour: analytics.alerts_by_hour(ctx),
        by_day: analytics.alerts_by_day(ctx),
        by_week_and_severity: analytics.alerts_by_week_and_severity(ctx),
        by_week_and_hours: analytics.alerts_by_week_and_hours(ctx),
        by_day_and_responder: analytics.alerts_by_day_and_responder(ctx),
        by_week_and_responder: analytics.alerts_by_week_and_responder(ctx),
        by_month_and_responder: analytics.alerts_by_month_and_responder(ctx),
        by_quarter_and_responder: analytics.alerts_by_quarter_and_responder(ctx),
        impact_by_week_and_responder: analytics.impact_by_week_and_responder(ctx),
    }
}
