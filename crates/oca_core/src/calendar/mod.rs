use time::{Duration, OffsetDateTime, Weekday};

/// Calendar granularity used to key report buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    IsoWeek,
    Month,
    Quarter,
}

impl Period {
    /// First instant of the period containing `dt`, in `dt`'s offset.
    pub fn floor(self, dt: OffsetDateTime) -> OffsetDateTime {
        match self {
            Period::IsoWeek => start_of_iso_week(dt),
            Period::Month => start_of_month(dt),
            Period::Quarter => start_of_quarter(dt),
        }
    }

    /// First instant of the following period. `start` must already be floored.
    ///
    /// `None` when that instant is past the largest representable date.
    pub fn next(self, start: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            Period::IsoWeek => start.checked_add(Duration::weeks(1)),
            Period::Month => next_month(start),
            Period::Quarter => next_month(start)
                .and_then(next_month)
                .and_then(next_month),
        }
    }

    pub fn key(self, dt: OffsetDateTime) -> String {
        match self {
            Period::IsoWeek => iso_week_key(dt),
            Period::Month => month_key(dt),
            Period::Quarter => quarter_key(dt),
        }
    }

    /// Every period start from `floor(from)` through `floor(to)`, both ends included.
    pub fn starts_between(self, from: OffsetDateTime, to: OffsetDateTime) -> Vec<OffsetDateTime> {
        let last = self.floor(to);
        let mut cursor = self.floor(from);
        let mut out = Vec::new();
        while cursor <= last {
            out.push(cursor);
            match self.next(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        out
    }
}

pub fn start_of_day(dt: OffsetDateTime) -> OffsetDateTime {
    dt.date().midnight().assume_offset(dt.offset())
}

pub fn start_of_iso_week(dt: OffsetDateTime) -> OffsetDateTime {
    let back = dt.weekday().number_days_from_monday();
    start_of_day(dt).saturating_sub(Duration::days(i64::from(back)))
}

/// Sunday-first week start.
pub fn start_of_week_sunday(dt: OffsetDateTime) -> OffsetDateTime {
    let back = dt.weekday().number_days_from_sunday();
    start_of_day(dt).saturating_sub(Duration::days(i64::from(back)))
}

pub fn start_of_month(dt: OffsetDateTime) -> OffsetDateTime {
    start_of_day(dt) - Duration::days(i64::from(dt.day()) - 1)
}

pub fn start_of_quarter(dt: OffsetDateTime) -> OffsetDateTime {
    let mut cursor = start_of_month(dt);
    for _ in 0..(month_index(dt) % 3) {
        cursor = start_of_month(cursor - Duration::days(1));
    }
    cursor
}

fn next_month(start: OffsetDateTime) -> Option<OffsetDateTime> {
    // From the 1st, 31 days always lands inside the next month.
    start_of_month(start)
        .checked_add(Duration::days(31))
        .map(start_of_month)
}

/// Same wall-clock time one calendar month earlier, clamping to the last day of a shorter month.
pub fn one_month_earlier(dt: OffsetDateTime) -> OffsetDateTime {
    let previous_month_len = (start_of_month(dt) - Duration::days(1)).day();
    dt - Duration::days(i64::from(previous_month_len.max(dt.day())))
}

fn month_index(dt: OffsetDateTime) -> u8 {
    u8::from(dt.month()) - 1
}

pub fn quarter_of(dt: OffsetDateTime) -> u8 {
    month_index(dt) / 3 + 1
}

/// `"w<iso week> - <iso week year>"`.
pub fn iso_week_key(dt: OffsetDateTime) -> String {
    let (year, week, _) = dt.to_iso_week_date();
    format!("w{week} - {year}")
}

/// `"<1-based month> / <year>"`.
pub fn month_key(dt: OffsetDateTime) -> String {
    format!("{} / {}", u8::from(dt.month()), dt.year())
}

/// `"Q<1-4> - <year>"`.
pub fn quarter_key(dt: OffsetDateTime) -> String {
    format!("Q{} - {}", quarter_of(dt), dt.year())
}

pub fn weekday_name(day: Weekday) -> String {
    day.to_string()
}

/// Weekdays in report order, Monday first.
pub fn weekdays_monday_first() -> [Weekday; 7] {
    [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ]
}

pub fn unix_millis(dt: OffsetDateTime) -> i64 {
    (dt.unix_timestamp_nanos() / 1_000_000) as i64
}
