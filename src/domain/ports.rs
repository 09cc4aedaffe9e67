use crate::core::pace::Pace;
use crate::domain::model::{Activity, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    /// File names directly under the storage root, unsorted.
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn interval_pace(&self) -> Pace;
    fn min_interval_distance(&self) -> f64;
    fn name_pattern(&self) -> &str;
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
    fn per_lap(&self) -> bool;
    fn intervals_only(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Activity>>;
    async fn transform(&self, data: Vec<Activity>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
