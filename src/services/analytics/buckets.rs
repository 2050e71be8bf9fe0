//! Fixed-size time buckets over a trailing window.
//!
//! Bucket sequences are dense and oldest-first: a day or month with no
//! matching records is still emitted with a zero value.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

impl TimeBucket {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// `YYYY-MM-DD`
    pub fn day_key(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM`
    pub fn month_key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `days` UTC calendar days ending with the day containing `now`.
pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Vec<TimeBucket> {
    let today = now.date_naive();
    (0..days as i64)
        .rev()
        .map(|offset| {
            let start = start_of_day(today - Duration::days(offset));
            TimeBucket {
                start,
                end: start + Duration::days(1),
            }
        })
        .collect()
}

/// `months` calendar months ending with the month containing `now`.
pub fn trailing_months(now: DateTime<Utc>, months: u32) -> Vec<TimeBucket> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..months as i32)
        .rev()
        .filter_map(|offset| {
            let index = current - offset;
            let start = first_of_month(index)?;
            let end = first_of_month(index + 1)?;
            Some(TimeBucket {
                start: start_of_day(start),
                end: start_of_day(end),
            })
        })
        .collect()
}

fn first_of_month(month_index: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(month_index.div_euclid(12), month_index.rem_euclid(12) as u32 + 1, 1)
}

/// Number of records whose timestamp falls in each bucket.
pub fn count_per_bucket<T, F>(buckets: &[TimeBucket], records: &[T], timestamp: F) -> Vec<u64>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    buckets
        .iter()
        .map(|bucket| {
            records
                .iter()
                .filter_map(&timestamp)
                .filter(|ts| bucket.contains(*ts))
                .count() as u64
        })
        .collect()
}

/// Sum of `value` over records whose timestamp falls in each bucket (unrounded).
pub fn sum_per_bucket<T, F, V>(
    buckets: &[TimeBucket],
    records: &[T],
    timestamp: F,
    value: V,
) -> Vec<f64>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
    V: Fn(&T) -> f64,
{
    buckets
        .iter()
        .map(|bucket| {
            records
                .iter()
                .filter(|&record| timestamp(record).is_some_and(|ts| bucket.contains(ts)))
                .map(&value)
                .sum()
        })
        .collect()
}
