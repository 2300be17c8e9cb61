use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopGenError};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Supplies the current instant. Date ranges anchor on its UTC date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC at the start of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Half-open range of calendar dates `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ShopGenError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` dates before `today`, excluding `today`.
    pub fn last_days(today: NaiveDate, days: u32) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(ShopGenError::DateOutOfRange { today, days })?;
        Self::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}
