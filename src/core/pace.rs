//! Pace as seconds per kilometre, with the `MM:SS` text form used on the
//! command line and in CSV output.

use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time per kilometre. Smaller is faster.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pace {
    secs_per_km: f64,
}

/// 04:15 min/km.
pub const DEFAULT_INTERVAL_PACE: Pace = Pace { secs_per_km: 255.0 };

impl Pace {
    pub fn from_secs_per_km(secs_per_km: f64) -> Result<Self> {
        if !secs_per_km.is_finite() || secs_per_km < 0.0 {
            return Err(EtlError::invalid_input(format!(
                "pace must be a finite, non-negative number of seconds per km, got {}",
                secs_per_km
            )));
        }
        Ok(Self { secs_per_km })
    }

    /// `None` when the distance is zero: a pace over no distance is undefined.
    pub fn from_distance_duration(distance_meters: f64, duration_seconds: f64) -> Option<Self> {
        if distance_meters <= 0.0 || !distance_meters.is_finite() || !duration_seconds.is_finite()
        {
            return None;
        }
        Some(Self {
            secs_per_km: duration_seconds / (distance_meters / 1000.0),
        })
    }

    pub fn from_speed_kph(speed_kph: f64) -> Result<Self> {
        if !speed_kph.is_finite() || speed_kph <= 0.0 {
            return Err(EtlError::invalid_input(format!(
                "speed must be positive, got {} km/h",
                speed_kph
            )));
        }
        Self::from_secs_per_km(3600.0 / speed_kph)
    }

    pub fn secs_per_km(&self) -> f64 {
        self.secs_per_km
    }

    pub fn is_positive(&self) -> bool {
        self.secs_per_km > 0.0
    }

    pub fn speed_kph(&self) -> Option<f64> {
        self.is_positive().then(|| 3600.0 / self.secs_per_km)
    }

    /// Pace run at `percent` of this pace's speed (100 = same pace, 105 = faster).
    pub fn at_speed_percent(&self, percent: f64) -> Result<Self> {
        let speed = self
            .speed_kph()
            .ok_or_else(|| EtlError::invalid_input("cannot scale a zero pace"))?;
        Self::from_speed_kph(speed * percent / 100.0)
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.secs_per_km.round() as u64;
        write!(f, "{:02}:{:02}", total / 60, total % 60)
    }
}

impl FromStr for Pace {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        let (minutes, seconds) = s
            .split_once(':')
            .ok_or_else(|| malformed_pace(s))?;
        let minutes = two_digits(minutes).ok_or_else(|| malformed_pace(s))?;
        let seconds = two_digits(seconds).ok_or_else(|| malformed_pace(s))?;
        if seconds >= 60 {
            return Err(malformed_pace(s));
        }
        Self::from_secs_per_km(f64::from(minutes * 60 + seconds))
    }
}

fn malformed_pace(s: &str) -> EtlError {
    EtlError::invalid_input(format!("pace '{}' is not in form MM:SS", s))
}

fn two_digits(part: &str) -> Option<u32> {
    if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

/// Parses a race time `[HH:]MM:SS` into seconds.
pub fn parse_race_time(s: &str) -> Result<f64> {
    let malformed = || EtlError::invalid_input(format!("time '{}' is not in form [HH:]MM:SS", s));
    let parts: Vec<u32> = s
        .split(':')
        .map(two_digits)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(malformed)?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => (0, *m, *sec),
        [h, m, sec] if *m < 60 => (*h, *m, *sec),
        _ => return Err(malformed()),
    };
    if seconds >= 60 {
        return Err(malformed());
    }
    Ok(f64::from(hours * 3600 + minutes * 60 + seconds))
}
