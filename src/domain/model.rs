use crate::core::pace::Pace;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded split of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub sequence_index: u32,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub avg_hr: Option<u32>,
    pub max_hr: Option<u32>,
}

impl Lap {
    pub fn new(sequence_index: u32, distance_meters: f64, duration_seconds: f64) -> Result<Self> {
        let lap = Self {
            sequence_index,
            distance_meters,
            duration_seconds,
            avg_hr: None,
            max_hr: None,
        };
        lap.check()?;
        Ok(lap)
    }

    pub fn with_heart_rate(mut self, avg_hr: u32, max_hr: u32) -> Self {
        self.avg_hr = Some(avg_hr);
        self.max_hr = Some(max_hr);
        self
    }

    /// Rejects negative or non-finite distance and duration.
    pub fn check(&self) -> Result<()> {
        if !self.distance_meters.is_finite() || self.distance_meters < 0.0 {
            return Err(EtlError::invalid_input(format!(
                "lap {} has invalid distance {}",
                self.sequence_index, self.distance_meters
            )));
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(EtlError::invalid_input(format!(
                "lap {} has invalid duration {}",
                self.sequence_index, self.duration_seconds
            )));
        }
        Ok(())
    }

    /// Undefined for zero-distance laps.
    pub fn pace(&self) -> Option<Pace> {
        Pace::from_distance_duration(self.distance_meters, self.duration_seconds)
    }

    /// Average heart rate times minutes, used for time-weighted averages.
    pub fn heartbeats(&self) -> Option<f64> {
        self.avg_hr
            .map(|hr| f64::from(hr) * self.duration_seconds / 60.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LapKind {
    Interval,
    Recovery,
}

impl LapKind {
    pub fn from_interval(is_interval: bool) -> Self {
        if is_interval {
            LapKind::Interval
        } else {
            LapKind::Recovery
        }
    }
}

impl fmt::Display for LapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapKind::Interval => write!(f, "interval"),
            LapKind::Recovery => write!(f, "recovery"),
        }
    }
}

/// An activity as read from the export directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub laps: Vec<Lap>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub csv_output: String,
    pub rows_written: usize,
    pub processed_activities: usize,
    pub skipped_activities: Vec<String>,
}
