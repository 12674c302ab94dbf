use std::cmp::Ordering;
use std::collections::BTreeMap;

use time::{Duration, OffsetDateTime};
use tracing::warn;

use crate::analytics::context::ReportContext;
use crate::calendar::{start_of_iso_week, weekday_name, weekdays_monday_first, Period};

pub(crate) struct Bucket<A> {
    pub key: String,
    pub date: OffsetDateTime,
    pub acc: A,
}

/// Zero-filled buckets for every period of a report range, addressable by period key.
pub(crate) struct BucketSet<A> {
    index: BTreeMap<String, usize>,
    buckets: Vec<Bucket<A>>,
    skipped: usize,
}

impl<A: Default> BucketSet<A> {
    fn empty() -> Self {
        Self {
            index: BTreeMap::new(),
            buckets: Vec::new(),
            skipped: 0,
        }
    }

    pub fn for_period(period: Period, ctx: &ReportContext) -> Self {
        let mut set = Self::empty();
        for start in period.starts_between(ctx.local_from(), ctx.local_to()) {
            set.insert(period.key(start), start);
        }
        set
    }

    /// Seven weekday buckets anchored on the ISO week containing `from`, so anchors sort Monday first.
    pub fn for_weekdays(ctx: &ReportContext) -> Self {
        let monday = start_of_iso_week(ctx.local_from());
        let mut set = Self::empty();
        for (offset, day) in (0i64..).zip(weekdays_monday_first()) {
            set.insert(weekday_name(day), monday.saturating_add(Duration::days(offset)));
        }
        set
    }

    fn insert(&mut self, key: String, date: OffsetDateTime) {
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key.clone(), self.buckets.len());
        self.buckets.push(Bucket {
            key,
            date,
            acc: A::default(),
        });
    }

    /// Accumulator for `key`; `None` (and counted as skipped) when the key is outside the range.
    pub fn slot(&mut self, key: &str) -> Option<&mut A> {
        match self.index.get(key) {
            Some(&i) => self.buckets.get_mut(i).map(|b| &mut b.acc),
            None => {
                self.skipped += 1;
                None
            }
        }
    }

    pub fn into_sorted(self, view: &str) -> Vec<Bucket<A>> {
        if self.skipped > 0 {
            warn!(
                view,
                skipped = self.skipped,
                "alerts created outside the report range were not bucketed"
            );
        }
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| compare_dates(&a.date, &b.date));
        buckets
    }
}

/// Earlier sorts first; equal anchors keep their relative order.
pub(crate) fn compare_dates(a: &OffsetDateTime, b: &OffsetDateTime) -> Ordering {
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
