use crate::core::pace::{Pace, DEFAULT_INTERVAL_PACE};
use crate::domain::model::Lap;
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_MIN_INTERVAL_DISTANCE: f64 = 150.0;

/// Thresholds deciding whether a lap is run at interval effort.
/// Built once per run and passed by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationConfig {
    interval_pace_threshold: Pace,
    min_interval_distance_meters: f64,
}

impl ClassificationConfig {
    pub fn new(interval_pace_threshold: Pace, min_interval_distance_meters: f64) -> Result<Self> {
        if !interval_pace_threshold.is_positive() {
            return Err(EtlError::invalid_input(format!(
                "interval pace threshold must be positive, got {}",
                interval_pace_threshold
            )));
        }
        if !min_interval_distance_meters.is_finite() || min_interval_distance_meters < 0.0 {
            return Err(EtlError::invalid_input(format!(
                "minimum interval distance must be >= 0, got {}",
                min_interval_distance_meters
            )));
        }
        Ok(Self {
            interval_pace_threshold,
            min_interval_distance_meters,
        })
    }

    pub fn interval_pace_threshold(&self) -> Pace {
        self.interval_pace_threshold
    }

    pub fn min_interval_distance_meters(&self) -> f64 {
        self.min_interval_distance_meters
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            interval_pace_threshold: DEFAULT_INTERVAL_PACE,
            min_interval_distance_meters: DEFAULT_MIN_INTERVAL_DISTANCE,
        }
    }
}

/// True when the lap is long enough and at least as fast as the threshold.
/// Both bounds are inclusive. Zero-distance laps are never intervals.
pub fn classify(lap: &Lap, config: &ClassificationConfig) -> Result<bool> {
    lap.check()?;

    if lap.distance_meters < config.min_interval_distance_meters {
        return Ok(false);
    }

    Ok(lap
        .pace()
        .is_some_and(|pace| pace <= config.interval_pace_threshold))
}
