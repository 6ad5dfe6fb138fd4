use std::time::Duration;

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc, Weekday};

/// A fixed weekly instant in UTC, e.g. Sunday 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyAnchor {
    weekday: Weekday,
    time: NaiveTime,
}

impl WeeklyAnchor {
    /// Sunday 00:00 UTC.
    pub const SUNDAY_MIDNIGHT: Self = Self {
        weekday: Weekday::Sun,
        time: NaiveTime::MIN,
    };

    /// Returns `None` when `hour` is not in `0..24`.
    pub fn new(weekday: Weekday, hour: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
        Some(Self { weekday, time })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// The next anchor instant strictly after `now`.
    ///
    /// An instant equal to `now` counts as missed, so Sunday 00:00:00 exactly
    /// waits a full week for Sunday midnight.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = days_between(now.weekday(), self.weekday);
        let candidate = (now.date_naive() + Days::new(days))
            .and_time(self.time)
            .and_utc();
        if candidate <= now {
            candidate + chrono::Duration::days(7)
        } else {
            candidate
        }
    }

    /// Time left until [`next_after`](Self::next_after).
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// The most recent anchor instant at or before `now`.
    pub fn week_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let back = days_between(self.weekday, now.weekday());
        let candidate = (now.date_naive() - Days::new(back))
            .and_time(self.time)
            .and_utc();
        if candidate > now {
            candidate - chrono::Duration::days(7)
        } else {
            candidate
        }
    }
}

impl Default for WeeklyAnchor {
    fn default() -> Self {
        Self::SUNDAY_MIDNIGHT
    }
}

/// Days from `from` forward to `to`, in `0..7`.
fn days_between(from: Weekday, to: Weekday) -> u64 {
    let from = from.num_days_from_monday() as i64;
    let to = to.num_days_from_monday() as i64;
    (to - from).rem_euclid(7) as u64
}
