use time::{OffsetDateTime, UtcOffset};

use crate::calendar::{one_month_earlier, start_of_week_sunday, unix_millis};
use crate::domain::{AlertRecord, Team};

/// Inputs for one report run.
///
/// Calendar fields (hour, weekday, week, month, quarter) are read in `offset`, which stands in
/// for the viewer's local time zone. Defaults to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub from: OffsetDateTime,
    pub to: OffsetDateTime,
    pub alerts: Vec<AlertRecord>,
    pub teams: Vec<Team>,
    pub offset: UtcOffset,
}

impl ReportContext {
    pub fn new(
        from: OffsetDateTime,
        to: OffsetDateTime,
        alerts: Vec<AlertRecord>,
        teams: Vec<Team>,
    ) -> Self {
        Self {
            from,
            to,
            alerts,
            teams,
            offset: UtcOffset::UTC,
        }
    }

    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Window ending at `now` and starting on the Sunday of the week one month earlier.
    ///
    /// Alerts created at or before `from` are dropped, mirroring what the fetch query asks for.
    pub fn trailing_month(
        now: OffsetDateTime,
        alerts: Vec<AlertRecord>,
        teams: Vec<Team>,
        offset: UtcOffset,
    ) -> Self {
        let to = now.to_offset(offset);
        let from = start_of_week_sunday(one_month_earlier(to));
        let alerts = alerts
            .into_iter()
            .filter(|a| a.created_at > from)
            .collect();
        Self {
            from,
            to,
            alerts,
            teams,
            offset,
        }
    }

    pub fn local(&self, dt: OffsetDateTime) -> OffsetDateTime {
        dt.to_offset(self.offset)
    }

    pub fn local_from(&self) -> OffsetDateTime {
        self.local(self.from)
    }

    pub fn local_to(&self) -> OffsetDateTime {
        self.local(self.to)
    }
}

/// Alert search filter covering `(from, to)`, in epoch milliseconds.
pub fn alert_window_query(from: OffsetDateTime, to: OffsetDateTime) -> String {
    format!(
        "createdAt < {} AND createdAt > {}",
        unix_millis(to),
        unix_millis(from)
    )
}
