pub mod classifier;
pub mod etl;
pub mod pace;
pub mod pipeline;
pub mod segmenter;
pub mod summary;
pub mod tcx;

pub use crate::domain::model::{Activity, Lap, LapKind, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
