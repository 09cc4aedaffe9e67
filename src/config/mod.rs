pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::classifier::DEFAULT_MIN_INTERVAL_DISTANCE;
#[cfg(feature = "cli")]
use crate::core::pace::{Pace, DEFAULT_INTERVAL_PACE};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

/// Activities are considered from January 1st of this year unless told otherwise.
pub const DEFAULT_START_YEAR: i32 = 2000;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "intervals.csv";
pub const DEFAULT_NAME_PATTERN: &str = ".*";

/// Options left unset fall back to the TOML file, then to built-in defaults.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "interval-etl")]
#[command(about = "Extracts interval sequences from garminexport activities")]
pub struct CliConfig {
    /// A directory holding activities backed-up by garminexport
    #[arg(value_name = "DIR")]
    pub activity_dir: String,

    /// TOML file with classification, filter and output settings
    #[arg(long)]
    pub config: Option<String>,

    /// Pace in min/km (MM:SS) at or below which a lap counts as an interval lap [default: 04:15]
    #[arg(long)]
    pub interval_pace: Option<Pace>,

    /// Laps shorter than this (meters) are never interval laps, so strides are not counted [default: 150]
    #[arg(long)]
    pub min_interval_distance: Option<f64>,

    /// Only activities whose title matches this pattern are considered [default: .*]
    #[arg(long = "name")]
    pub name_pattern: Option<String>,

    /// Activities must start on or after this date (YYYY-MM-DD) [default: 2000-01-01]
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Activities must start on or before this date (YYYY-MM-DD) [default: today]
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Directory the CSV file is written to [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    /// Name of the CSV file [default: intervals.csv]
    #[arg(long)]
    pub output_file: Option<String>,

    /// Emit one row per lap instead of one row per activity [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub per_lap: Option<bool>,

    /// Leave out activities without any interval lap [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub intervals_only: Option<bool>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 用設定檔補上命令列沒有指定的選項
    pub fn merge_file(&mut self, file: &TomlConfig) -> Result<()> {
        if self.interval_pace.is_none() {
            self.interval_pace = file.interval_pace()?;
        }
        if self.min_interval_distance.is_none() {
            self.min_interval_distance = file.min_interval_distance();
        }
        if self.name_pattern.is_none() {
            self.name_pattern = file.name_pattern().map(str::to_string);
        }
        if self.start_date.is_none() {
            self.start_date = file.start_date()?;
        }
        if self.end_date.is_none() {
            self.end_date = file.end_date()?;
        }

        let output = file.output();
        if self.output_path.is_none() {
            self.output_path = output.output_path;
        }
        if self.output_file.is_none() {
            self.output_file = output.file_name;
        }
        if self.per_lap.is_none() {
            self.per_lap = output.per_lap;
        }
        if self.intervals_only.is_none() {
            self.intervals_only = output.intervals_only;
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_file(&self) -> &str {
        self.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn interval_pace(&self) -> Pace {
        self.interval_pace.unwrap_or(DEFAULT_INTERVAL_PACE)
    }

    fn min_interval_distance(&self) -> f64 {
        self.min_interval_distance
            .unwrap_or(DEFAULT_MIN_INTERVAL_DISTANCE)
    }

    fn name_pattern(&self) -> &str {
        self.name_pattern.as_deref().unwrap_or(DEFAULT_NAME_PATTERN)
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(DEFAULT_START_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
        })
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn per_lap(&self) -> bool {
        self.per_lap.unwrap_or(false)
    }

    fn intervals_only(&self) -> bool {
        self.intervals_only.unwrap_or(false)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("activity_dir", &self.activity_dir)?;
        validation::validate_path("output_path", self.output_path())?;
        validation::validate_non_empty_string("output_file", self.output_file())?;
        validation::validate_positive("interval_pace", self.interval_pace().secs_per_km())?;
        validation::validate_non_negative("min_interval_distance", self.min_interval_distance())?;
        validation::validate_regex("name", self.name_pattern())?;
        validation::validate_date_range("start_date", self.start_date(), self.end_date())?;
        Ok(())
    }
}
