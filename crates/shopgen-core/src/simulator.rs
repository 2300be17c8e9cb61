//! Order volume simulation.
//!
//! Each calendar day is simulated on its own: the weekday picks a volume
//! band, a count is drawn from it, and every order gets a creation instant
//! somewhere in that day plus an optional completion a few minutes later.
//! Nothing carries over from one day to the next.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::daterange::DateRange;
use crate::error::Result;
use crate::policy::SimulationPolicy;
use crate::random::RandomSource;
use crate::sink::OrderSink;
use crate::types::Order;

/// Last second of a day, counted from midnight.
const DAY_LAST_SECOND: i64 = 24 * 60 * 60 - 1;

/// Closed window `[date 00:00:00, date 23:59:59]` in UTC.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::seconds(DAY_LAST_SECOND))
}

#[derive(Debug, Clone, Default)]
pub struct OrderSimulator {
    policy: SimulationPolicy,
}

impl OrderSimulator {
    pub fn new(policy: SimulationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &SimulationPolicy {
        &self.policy
    }

    /// Orders for a single day, in generation order (not sorted by time).
    pub fn simulate_day<S>(&self, date: NaiveDate, source: &mut S) -> Result<Vec<Order>>
    where
        S: RandomSource + ?Sized,
    {
        let band = self.policy.volume.band_for(date);
        let count = source.uniform_int(i64::from(band.min), i64::from(band.max))? as usize;
        let (day_start, day_end) = day_window(date);
        let completion = &self.policy.completion;

        let mut orders = Vec::with_capacity(count);
        for _ in 0..count {
            let created_at = source.uniform_instant(day_start, day_end)?;
            let completed_at = if source.chance(completion.incomplete_probability)? {
                None
            } else {
                let minutes = source.uniform_int(
                    i64::from(completion.min_latency_minutes),
                    i64::from(completion.max_latency_minutes),
                )?;
                Some(created_at + Duration::minutes(minutes))
            };
            orders.push(Order {
                created_at,
                completed_at,
            });
        }
        debug!(%date, orders = count, "simulated day");
        Ok(orders)
    }

    /// Orders for every day in `[start, end)`, concatenated day by day.
    pub fn simulate_range<S>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        source: &mut S,
    ) -> Result<Vec<Order>>
    where
        S: RandomSource + ?Sized,
    {
        let range = DateRange::new(start, end)?;
        let mut orders = Vec::new();
        self.run(range, source, &mut orders)?;
        Ok(orders)
    }

    /// Simulate `range`, handing each day's batch to `sink`. Returns the
    /// total number of orders produced.
    pub fn run<S, K>(&self, range: DateRange, source: &mut S, sink: &mut K) -> Result<usize>
    where
        S: RandomSource + ?Sized,
        K: OrderSink + ?Sized,
    {
        let mut total = 0;
        for date in range.days() {
            let orders = self.simulate_day(date, source)?;
            total += orders.len();
            sink.accept(date, &orders)?;
        }
        Ok(total)
    }
}

/// [`OrderSimulator::simulate_day`] with the default (simple) policy.
pub fn simulate_day<S>(date: NaiveDate, source: &mut S) -> Result<Vec<Order>>
where
    S: RandomSource + ?Sized,
{
    OrderSimulator::default().simulate_day(date, source)
}

/// [`OrderSimulator::simulate_range`] with the default (simple) policy.
pub fn simulate_range<S>(start: NaiveDate, end: NaiveDate, source: &mut S) -> Result<Vec<Order>>
where
    S: RandomSource + ?Sized,
{
    OrderSimulator::default().simulate_range(start, end, source)
}
