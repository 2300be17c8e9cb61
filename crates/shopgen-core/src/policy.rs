use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopGenError};
use crate::types::{weekday_index, PolicyVariant, SATURDAY, SUNDAY, WEEKDAY_NAMES};

pub const DEFAULT_INCOMPLETE_PROBABILITY: f64 = 0.01;
pub const DEFAULT_MIN_LATENCY_MINUTES: u32 = 1;
pub const DEFAULT_MAX_LATENCY_MINUTES: u32 = 10;

pub const WEEKDAY_BAND: VolumeBand = VolumeBand::new(15, 40);
pub const SATURDAY_BAND: VolumeBand = VolumeBand::new(15, 30);
pub const SUNDAY_BAND: VolumeBand = VolumeBand::new(10, 20);

/// Upper bound for any band; a day's orders are held in memory at once.
pub const MAX_DAILY_VOLUME: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// VolumeBand
// ---------------------------------------------------------------------------

/// Inclusive range of daily order counts to sample from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBand {
    pub min: u32,
    pub max: u32,
}

impl VolumeBand {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, n: usize) -> bool {
        (self.min as usize..=self.max as usize).contains(&n)
    }
}

// ---------------------------------------------------------------------------
// VolumePolicy
// ---------------------------------------------------------------------------

/// Weekday → volume band table, indexed 0 = Monday … 6 = Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumePolicy {
    bands: [VolumeBand; 7],
}

impl VolumePolicy {
    pub fn from_bands(bands: [VolumeBand; 7]) -> Self {
        Self { bands }
    }

    /// Same band every day.
    pub fn uniform(band: VolumeBand) -> Self {
        Self { bands: [band; 7] }
    }

    pub fn simple() -> Self {
        Self::uniform(WEEKDAY_BAND).with_band(SUNDAY, SUNDAY_BAND)
    }

    pub fn rich() -> Self {
        Self::simple().with_band(SATURDAY, SATURDAY_BAND)
    }

    pub fn for_variant(variant: PolicyVariant) -> Self {
        match variant {
            PolicyVariant::Simple => Self::simple(),
            PolicyVariant::Rich => Self::rich(),
        }
    }

    /// Replace the band for weekday index `day` (0 = Monday). Out-of-range
    /// indexes are ignored.
    pub fn with_band(mut self, day: usize, band: VolumeBand) -> Self {
        if let Some(slot) = self.bands.get_mut(day) {
            *slot = band;
        }
        self
    }

    pub fn bands(&self) -> &[VolumeBand; 7] {
        &self.bands
    }

    pub fn band_at(&self, day: usize) -> Option<VolumeBand> {
        self.bands.get(day).copied()
    }

    pub fn band_for(&self, date: NaiveDate) -> VolumeBand {
        self.bands[weekday_index(date)]
    }

    /// Largest count any day can draw.
    pub fn max_daily(&self) -> u32 {
        self.bands.iter().map(|b| b.max).max().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        for (day, band) in self.bands.iter().enumerate() {
            if band.min > band.max {
                return Err(ShopGenError::InvalidPolicy(format!(
                    "{} band has min {} > max {}",
                    WEEKDAY_NAMES[day], band.min, band.max
                )));
            }
            if band.max > MAX_DAILY_VOLUME {
                return Err(ShopGenError::InvalidPolicy(format!(
                    "{} band max {} exceeds the daily limit {}",
                    WEEKDAY_NAMES[day], band.max, MAX_DAILY_VOLUME
                )));
            }
        }
        Ok(())
    }
}

impl Default for VolumePolicy {
    fn default() -> Self {
        Self::simple()
    }
}

// ---------------------------------------------------------------------------
// CompletionPolicy
// ---------------------------------------------------------------------------

/// How an order's completion timestamp is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionPolicy {
    pub incomplete_probability: f64,
    pub min_latency_minutes: u32,
    pub max_latency_minutes: u32,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            incomplete_probability: DEFAULT_INCOMPLETE_PROBABILITY,
            min_latency_minutes: DEFAULT_MIN_LATENCY_MINUTES,
            max_latency_minutes: DEFAULT_MAX_LATENCY_MINUTES,
        }
    }
}

impl CompletionPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.incomplete_probability) {
            return Err(ShopGenError::InvalidPolicy(format!(
                "incomplete_probability {} outside 0..=1",
                self.incomplete_probability
            )));
        }
        // completed_at must stay strictly after created_at
        if self.min_latency_minutes < 1 {
            return Err(ShopGenError::InvalidPolicy(
                "min_latency_minutes must be at least 1".to_string(),
            ));
        }
        if self.min_latency_minutes > self.max_latency_minutes {
            return Err(ShopGenError::InvalidPolicy(format!(
                "min_latency_minutes {} > max_latency_minutes {}",
                self.min_latency_minutes, self.max_latency_minutes
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SimulationPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationPolicy {
    pub volume: VolumePolicy,
    pub completion: CompletionPolicy,
}

impl SimulationPolicy {
    pub fn for_variant(variant: PolicyVariant) -> Self {
        Self {
            volume: VolumePolicy::for_variant(variant),
            completion: CompletionPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.volume.validate()?;
        self.completion.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_policy_bands() {
        let p = VolumePolicy::simple();
        assert_eq!(p.band_at(SUNDAY), Some(SUNDAY_BAND));
        assert_eq!(p.band_at(SATURDAY), Some(WEEKDAY_BAND));
        for day in 0..5 {
            assert_eq!(p.band_at(day), Some(WEEKDAY_BAND));
        }
        assert_eq!(p.max_daily(), 40);
    }

    #[test]
    fn rich_policy_adds_saturday() {
        let p = VolumePolicy::rich();
        assert_eq!(p.band_at(SATURDAY), Some(SATURDAY_BAND));
        assert_eq!(p.band_at(SUNDAY), Some(SUNDAY_BAND));
        assert_eq!(p.band_at(2), Some(WEEKDAY_BAND));
    }

    #[test]
    fn band_for_date_uses_weekday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(VolumePolicy::rich().band_for(sunday), SUNDAY_BAND);
    }

    #[test]
    fn with_band_ignores_bad_index() {
        let p = VolumePolicy::simple().with_band(9, VolumeBand::new(1, 1));
        assert_eq!(p, VolumePolicy::simple());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let p = VolumePolicy::simple().with_band(0, VolumeBand::new(30, 10));
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("monday"), "{err}");
    }

    #[test]
    fn oversized_band_is_rejected() {
        let limit = VolumeBand::new(MAX_DAILY_VOLUME, MAX_DAILY_VOLUME);
        let at_limit = VolumePolicy::uniform(limit);
        assert!(at_limit.validate().is_ok());

        let p = VolumePolicy::simple().with_band(2, VolumeBand::new(u32::MAX, u32::MAX));
        let err = p.validate().unwrap_err();
        assert!(matches!(err, ShopGenError::InvalidPolicy(m) if m.contains("wednesday")));
    }

    #[test]
    fn completion_validation() {
        assert!(CompletionPolicy::default().validate().is_ok());
        let zero_latency = CompletionPolicy {
            min_latency_minutes: 0,
            ..Default::default()
        };
        assert!(zero_latency.validate().is_err());
        let bad_p = CompletionPolicy {
            incomplete_probability: -0.1,
            ..Default::default()
        };
        assert!(bad_p.validate().is_err());
        let inverted = CompletionPolicy {
            min_latency_minutes: 5,
            max_latency_minutes: 2,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn volume_policy_yaml_is_a_plain_list() {
        let yaml = serde_yaml::to_string(&VolumePolicy::rich()).unwrap();
        let parsed: VolumePolicy = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, VolumePolicy::rich());
        assert!(yaml.starts_with("- min: 15"), "{yaml}");
    }
}
