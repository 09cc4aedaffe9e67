use crate::core::classifier::ClassificationConfig;
use crate::core::segmenter::segment;
use crate::core::summary::{lap_rows, ActivitySummary, SummaryRow};
use crate::core::tcx;
use crate::core::{Activity, ConfigProvider, Pipeline, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use chrono::DateTime;
use regex::Regex;
use serde::Deserialize;

/// garminexport summary files, e.g. `2020-06-04T05:11:37+00:00_5037219985_summary.json`
const ACTIVITY_FILE_PATTERN: &str =
    r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{2}:\d{2})_(\d+)_summary\.json$";

/// Only the title is read from the summary; laps live in the `.tcx` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    #[serde(default)]
    activity_name: Option<String>,
}

/// Reads exported activities from `source`, splits them into interval and
/// recovery segments and writes one CSV file to `sink`.
pub struct IntervalPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    classification: ClassificationConfig,
    file_pattern: Regex,
    name_pattern: Regex,
}

impl<S: Storage, C: ConfigProvider> IntervalPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Result<Self> {
        let classification =
            ClassificationConfig::new(config.interval_pace(), config.min_interval_distance())?;
        let name_pattern = Regex::new(config.name_pattern())?;

        Ok(Self {
            source,
            sink,
            config,
            classification,
            file_pattern: Regex::new(ACTIVITY_FILE_PATTERN)?,
            name_pattern,
        })
    }

    async fn read_activity(
        &self,
        file_name: &str,
        id: &str,
        start_time: &str,
    ) -> Result<Option<Activity>> {
        let start_time = DateTime::parse_from_rfc3339(start_time).map_err(|e| {
            EtlError::ProcessingError {
                message: format!("bad start time in '{}': {}", file_name, e),
            }
        })?;

        let bytes = self.source.read_file(file_name).await?;
        let raw: RawActivity = serde_json::from_slice(&bytes)?;

        let name = match raw.activity_name {
            Some(name) if !name.is_empty() => name,
            _ => {
                tracing::debug!("{}: activity has no name, skipping", file_name);
                return Ok(None);
            }
        };
        if !self.name_pattern.is_match(&name) {
            return Ok(None);
        }

        let tcx_name = file_name.replace("_summary.json", ".tcx");
        let bytes = self.source.read_file(&tcx_name).await?;
        let text = std::str::from_utf8(&bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("'{}' is not UTF-8: {}", tcx_name, e),
        })?;
        let laps = tcx::parse_laps(text)?;
        if laps.is_empty() {
            tracing::warn!("{}: no laps found, skipping", tcx_name);
            return Ok(None);
        }

        Ok(Some(Activity {
            id: id.to_string(),
            name,
            start_time,
            laps,
        }))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for IntervalPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Activity>> {
        let mut file_names = self.source.list_files().await?;
        // ISO timestamps as prefix: name order is chronological
        file_names.sort();

        let start_date = self.config.start_date().format("%Y-%m-%d").to_string();
        let end_date = self.config.end_date().format("%Y-%m-%d").to_string();
        tracing::debug!("Reading activities from {} to {}", start_date, end_date);

        let mut activities = Vec::new();
        for file_name in &file_names {
            let Some(caps) = self.file_pattern.captures(file_name) else {
                continue;
            };
            let (timestamp, id) = (&caps[1], &caps[2]);

            // the date prefix is the local start date of the activity
            let date = &timestamp[..10];
            if date < start_date.as_str() {
                continue;
            }
            if date > end_date.as_str() {
                break;
            }

            match self.read_activity(file_name, id, timestamp).await {
                Ok(Some(activity)) => {
                    tracing::debug!(
                        "{}: activity {}, name: {}, {} laps",
                        activity.start_time,
                        activity.id,
                        activity.name,
                        activity.laps.len()
                    );
                    activities.push(activity);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping {}: {}", file_name, e),
            }
        }

        Ok(activities)
    }

    async fn transform(&self, data: Vec<Activity>) -> Result<TransformResult> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut rows_written = 0;
        let mut processed_activities = 0;
        let mut skipped_activities = Vec::new();

        for activity in &data {
            let segments = match segment(&activity.laps, &self.classification) {
                Ok(segments) => segments,
                Err(e) => {
                    tracing::warn!("Skipping activity {}: {}", activity.id, e);
                    skipped_activities.push(activity.id.clone());
                    continue;
                }
            };

            let summary = ActivitySummary::new(activity, &segments);
            if self.config.intervals_only() && !summary.has_intervals() {
                tracing::debug!("Activity {}: no interval laps found", activity.id);
                continue;
            }
            processed_activities += 1;

            if self.config.per_lap() {
                for row in lap_rows(activity, &segments) {
                    writer.serialize(row)?;
                    rows_written += 1;
                }
            } else {
                writer.serialize(SummaryRow::from(&summary))?;
                rows_written += 1;
            }
        }

        if rows_written == 0 {
            tracing::warn!("No activities matched, output will be empty");
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| EtlError::IoError(e.into_error()))?;
        let csv_output = String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("CSV output is not UTF-8: {}", e),
        })?;

        Ok(TransformResult {
            csv_output,
            rows_written,
            processed_activities,
            skipped_activities,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), self.config.output_file());

        tracing::debug!(
            "Writing {} rows ({} bytes) to storage",
            result.rows_written,
            result.csv_output.len()
        );
        self.sink
            .write_file(self.config.output_file(), result.csv_output.as_bytes())
            .await?;

        Ok(output_path)
    }
}
