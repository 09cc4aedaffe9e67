pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::classifier::{classify, ClassificationConfig};
pub use core::pace::Pace;
pub use core::segmenter::{segment, Segment};
pub use core::summary::ActivitySummary;
pub use core::{etl::EtlEngine, pipeline::IntervalPipeline};
pub use domain::model::{Activity, Lap, LapKind};
pub use utils::error::{EtlError, Result};
