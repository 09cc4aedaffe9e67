use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting activities...");
        let activities = self.pipeline.extract().await?;
        tracing::info!("Extracted {} activities", activities.len());

        tracing::info!("Segmenting laps...");
        let result = self.pipeline.transform(activities).await?;
        tracing::info!(
            "Summarized {} activities into {} rows",
            result.processed_activities,
            result.rows_written
        );
        if !result.skipped_activities.is_empty() {
            tracing::warn!(
                "Skipped {} activities with invalid laps: {}",
                result.skipped_activities.len(),
                result.skipped_activities.join(", ")
            );
        }

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
