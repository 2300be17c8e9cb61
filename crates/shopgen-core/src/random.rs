//! Randomness behind a small trait so the simulator can run on a seeded
//! generator in production and on a scripted queue of draws in tests.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, ShopGenError};

// ---------------------------------------------------------------------------
// RandomSource
// ---------------------------------------------------------------------------

/// Source of the three kinds of draws the simulator needs.
///
/// Every method takes `&mut self`; a source shared between threads needs its
/// own synchronization.
pub trait RandomSource {
    /// Uniform integer in `low..=high`.
    fn uniform_int(&mut self, low: i64, high: i64) -> Result<i64>;

    /// Uniform instant in `start..=end`, second resolution.
    fn uniform_instant(&mut self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> Result<DateTime<Utc>>;

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> Result<bool>;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform_int(&mut self, low: i64, high: i64) -> Result<i64> {
        (**self).uniform_int(low, high)
    }

    fn uniform_instant(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        (**self).uniform_instant(start, end)
    }

    fn chance(&mut self, p: f64) -> Result<bool> {
        (**self).chance(p)
    }
}

fn check_int_bounds(low: i64, high: i64) -> Result<()> {
    if low > high {
        return Err(ShopGenError::InvalidDraw(format!(
            "empty integer range {low}..={high}"
        )));
    }
    Ok(())
}

fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(ShopGenError::InvalidDraw(format!(
            "empty time window {start}..={end}"
        )));
    }
    Ok(())
}

fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ShopGenError::InvalidDraw(format!(
            "probability {p} outside 0..=1"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RngSource
// ---------------------------------------------------------------------------

/// [`RandomSource`] backed by any `rand` generator. Never exhausts.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Same seed, same draws (within one build of the crate).
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// The wrapped generator, for callers that need `rand`/`fake` directly.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_int(&mut self, low: i64, high: i64) -> Result<i64> {
        check_int_bounds(low, high)?;
        Ok(self.rng.gen_range(low..=high))
    }

    fn uniform_instant(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        check_window(start, end)?;
        // Round the lower bound up so a sub-second start is never undercut.
        let low = start.timestamp() + i64::from(start.timestamp_subsec_nanos() > 0);
        let high = end.timestamp();
        if low > high {
            return Ok(start);
        }
        let secs = self.rng.gen_range(low..=high);
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ShopGenError::InvalidDraw(format!("timestamp {secs} out of range")))
    }

    fn chance(&mut self, p: f64) -> Result<bool> {
        check_probability(p)?;
        Ok(self.rng.gen_bool(p))
    }
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// Replays pre-recorded draws in order, one queue per draw kind.
///
/// Running dry yields [`ShopGenError::RandomSourceExhausted`]; a queued value
/// outside the requested bounds yields [`ShopGenError::InvalidDraw`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    ints: VecDeque<i64>,
    instants: VecDeque<DateTime<Utc>>,
    flags: VecDeque<bool>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i64>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn with_instants(mut self, instants: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.instants.extend(instants);
        self
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = bool>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Number of draws still queued, across all kinds.
    pub fn remaining(&self) -> usize {
        self.ints.len() + self.instants.len() + self.flags.len()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_int(&mut self, low: i64, high: i64) -> Result<i64> {
        check_int_bounds(low, high)?;
        let v = self
            .ints
            .pop_front()
            .ok_or(ShopGenError::RandomSourceExhausted)?;
        if !(low..=high).contains(&v) {
            return Err(ShopGenError::InvalidDraw(format!(
                "scripted int {v} outside {low}..={high}"
            )));
        }
        Ok(v)
    }

    fn uniform_instant(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        check_window(start, end)?;
        let v = self
            .instants
            .pop_front()
            .ok_or(ShopGenError::RandomSourceExhausted)?;
        if v < start || v > end {
            return Err(ShopGenError::InvalidDraw(format!(
                "scripted instant {v} outside {start}..={end}"
            )));
        }
        Ok(v)
    }

    fn chance(&mut self, p: f64) -> Result<bool> {
        check_probability(p)?;
        self.flags
            .pop_front()
            .ok_or(ShopGenError::RandomSourceExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn seeded_sources_agree() {
        let mut a = RngSource::seeded(7);
        let mut b = RngSource::seeded(7);
        for _ in 0..100 {
            assert_eq!(
                a.uniform_int(0, 1_000).unwrap(),
                b.uniform_int(0, 1_000).unwrap()
            );
        }
    }

    #[test]
    fn uniform_int_respects_bounds() {
        let mut src = RngSource::seeded(1);
        for _ in 0..1_000 {
            let v = src.uniform_int(10, 20).unwrap();
            assert!((10..=20).contains(&v));
        }
        assert_eq!(src.uniform_int(5, 5).unwrap(), 5);
    }

    #[test]
    fn uniform_int_rejects_empty_range() {
        let mut src = RngSource::seeded(1);
        assert!(matches!(
            src.uniform_int(3, 2),
            Err(ShopGenError::InvalidDraw(_))
        ));
    }

    #[test]
    fn uniform_instant_stays_in_window() {
        let mut src = RngSource::seeded(3);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::seconds(59);
        for _ in 0..500 {
            let t = src.uniform_instant(start, end).unwrap();
            assert!(t >= start && t <= end, "{t} outside window");
        }
        assert_eq!(src.uniform_instant(start, start).unwrap(), start);
    }

    #[test]
    fn chance_extremes() {
        let mut src = RngSource::seeded(9);
        assert!(!src.chance(0.0).unwrap());
        assert!(src.chance(1.0).unwrap());
        assert!(src.chance(1.5).is_err());
    }

    #[test]
    fn scripted_replays_then_exhausts() {
        let mut src = ScriptedSource::new().with_ints([4, 9]).with_flags([true]);
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.uniform_int(0, 10).unwrap(), 4);
        assert_eq!(src.uniform_int(0, 10).unwrap(), 9);
        assert!(src.chance(0.5).unwrap());
        assert!(matches!(
            src.uniform_int(0, 10),
            Err(ShopGenError::RandomSourceExhausted)
        ));
        assert!(matches!(
            src.chance(0.5),
            Err(ShopGenError::RandomSourceExhausted)
        ));
    }

    #[test]
    fn scripted_rejects_out_of_bounds_value() {
        let mut src = ScriptedSource::new().with_ints([50]);
        assert!(matches!(
            src.uniform_int(0, 10),
            Err(ShopGenError::InvalidDraw(_))
        ));
    }

    #[test]
    fn mut_ref_forwards() {
        fn draw(src: &mut dyn RandomSource) -> i64 {
            src.uniform_int(1, 1).unwrap()
        }
        let mut src = RngSource::seeded(0);
        assert_eq!(draw(&mut src), 1);
    }
}
