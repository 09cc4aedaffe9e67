use crate::core::pace::Pace;
use crate::core::segmenter::Segment;
use crate::domain::model::{Activity, Lap, LapKind};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Totals over every lap of one kind within an activity.
#[derive(Debug, Clone, PartialEq)]
pub struct KindTotals {
    pub kind: LapKind,
    pub total_distance: f64,
    pub total_duration: f64,
    pub lap_count: usize,
    pub segment_count: usize,
    pub average_pace: Option<Pace>,
    pub fastest_pace: Option<Pace>,
    pub slowest_pace: Option<Pace>,
    pub min_lap_duration: Option<f64>,
    pub max_lap_duration: Option<f64>,
    pub avg_hr: Option<u32>,
    pub max_hr: Option<u32>,
}

impl KindTotals {
    pub fn from_segments(kind: LapKind, segments: &[Segment]) -> Self {
        let matching: Vec<&Segment> = segments.iter().filter(|s| s.kind == kind).collect();
        let laps: Vec<&Lap> = matching.iter().flat_map(|s| s.laps.iter()).collect();

        let total_distance: f64 = laps.iter().fold(0.0, |acc, lap| acc + lap.distance_meters);
        let total_duration: f64 = laps.iter().fold(0.0, |acc, lap| acc + lap.duration_seconds);

        let paces = || laps.iter().filter_map(|lap| lap.pace());
        let durations = || laps.iter().map(|lap| lap.duration_seconds);

        Self {
            kind,
            total_distance,
            total_duration,
            lap_count: laps.len(),
            segment_count: matching.len(),
            average_pace: Pace::from_distance_duration(total_distance, total_duration),
            fastest_pace: paces().reduce(|a, b| if b < a { b } else { a }),
            slowest_pace: paces().reduce(|a, b| if b > a { b } else { a }),
            min_lap_duration: durations().reduce(f64::min),
            max_lap_duration: durations().reduce(f64::max),
            avg_hr: time_weighted_hr(&laps),
            max_hr: laps.iter().filter_map(|lap| lap.max_hr).max(),
        }
    }

    pub fn avg_lap_distance(&self) -> Option<f64> {
        (self.lap_count > 0).then(|| self.total_distance / self.lap_count as f64)
    }

    pub fn avg_lap_duration(&self) -> Option<f64> {
        (self.lap_count > 0).then(|| self.total_duration / self.lap_count as f64)
    }
}

// Total heartbeats over total minutes, counting only laps that carry a heart rate.
fn time_weighted_hr(laps: &[&Lap]) -> Option<u32> {
    let (beats, seconds) = laps
        .iter()
        .filter_map(|lap| lap.heartbeats().map(|b| (b, lap.duration_seconds)))
        .fold((0.0, 0.0), |(beats, secs), (b, s)| (beats + b, secs + s));

    (seconds > 0.0).then(|| (beats / (seconds / 60.0)).round() as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    pub activity_id: String,
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub interval: KindTotals,
    pub recovery: KindTotals,
}

impl ActivitySummary {
    pub fn new(activity: &Activity, segments: &[Segment]) -> Self {
        Self {
            activity_id: activity.id.clone(),
            name: activity.name.clone(),
            start_time: activity.start_time,
            interval: KindTotals::from_segments(LapKind::Interval, segments),
            recovery: KindTotals::from_segments(LapKind::Recovery, segments),
        }
    }

    pub fn has_intervals(&self) -> bool {
        self.interval.lap_count > 0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pace_cell(pace: Option<Pace>) -> Option<String> {
    pace.map(|p| p.to_string())
}

/// One CSV row per activity.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub time: String,
    pub activity_id: String,
    pub name: String,
    pub i_distance: f64,
    pub i_time: f64,
    pub i_avg_pace: Option<String>,
    pub i_laps: usize,
    pub i_segments: usize,
    pub i_avg_lap_distance: Option<f64>,
    pub i_avg_lap_time: Option<f64>,
    pub i_min_lap_time: Option<f64>,
    pub i_max_lap_time: Option<f64>,
    pub i_fastest_pace: Option<String>,
    pub i_slowest_pace: Option<String>,
    pub i_avg_hr: Option<u32>,
    pub i_max_hr: Option<u32>,
    pub r_distance: f64,
    pub r_time: f64,
    pub r_avg_pace: Option<String>,
    pub r_laps: usize,
    pub r_segments: usize,
    pub r_avg_lap_distance: Option<f64>,
    pub r_avg_lap_time: Option<f64>,
    pub r_min_lap_time: Option<f64>,
    pub r_max_lap_time: Option<f64>,
    pub r_fastest_pace: Option<String>,
    pub r_slowest_pace: Option<String>,
    pub r_avg_hr: Option<u32>,
    pub r_max_hr: Option<u32>,
}

impl From<&ActivitySummary> for SummaryRow {
    fn from(summary: &ActivitySummary) -> Self {
        let i = &summary.interval;
        let r = &summary.recovery;
        Self {
            time: summary.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            activity_id: summary.activity_id.clone(),
            name: summary.name.clone(),
            i_distance: round2(i.total_distance),
            i_time: round2(i.total_duration),
            i_avg_pace: pace_cell(i.average_pace),
            i_laps: i.lap_count,
            i_segments: i.segment_count,
            i_avg_lap_distance: i.avg_lap_distance().map(round2),
            i_avg_lap_time: i.avg_lap_duration().map(round2),
            i_min_lap_time: i.min_lap_duration.map(round2),
            i_max_lap_time: i.max_lap_duration.map(round2),
            i_fastest_pace: pace_cell(i.fastest_pace),
            i_slowest_pace: pace_cell(i.slowest_pace),
            i_avg_hr: i.avg_hr,
            i_max_hr: i.max_hr,
            r_distance: round2(r.total_distance),
            r_time: round2(r.total_duration),
            r_avg_pace: pace_cell(r.average_pace),
            r_laps: r.lap_count,
            r_segments: r.segment_count,
            r_avg_lap_distance: r.avg_lap_distance().map(round2),
            r_avg_lap_time: r.avg_lap_duration().map(round2),
            r_min_lap_time: r.min_lap_duration.map(round2),
            r_max_lap_time: r.max_lap_duration.map(round2),
            r_fastest_pace: pace_cell(r.fastest_pace),
            r_slowest_pace: pace_cell(r.slowest_pace),
            r_avg_hr: r.avg_hr,
            r_max_hr: r.max_hr,
        }
    }
}

/// One CSV row per lap, tagged with its segment.
#[derive(Debug, Clone, Serialize)]
pub struct LapRow {
    pub time: String,
    pub activity_id: String,
    pub lap: u32,
    pub segment: usize,
    pub kind: LapKind,
    pub distance: f64,
    pub duration: f64,
    pub pace: Option<String>,
    pub avg_hr: Option<u32>,
    pub max_hr: Option<u32>,
}

pub fn lap_rows(activity: &Activity, segments: &[Segment]) -> Vec<LapRow> {
    let time = activity.start_time.format("%Y-%m-%d %H:%M:%S").to_string();
    segments
        .iter()
        .flat_map(|segment| {
            segment.laps.iter().map(|lap| LapRow {
                time: time.clone(),
                activity_id: activity.id.clone(),
                lap: lap.sequence_index,
                segment: segment.index,
                kind: segment.kind,
                distance: round2(lap.distance_meters),
                duration: round2(lap.duration_seconds),
                pace: pace_cell(lap.pace()),
                avg_hr: lap.avg_hr,
                max_hr: lap.max_hr,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::ClassificationConfig;
    use crate::core::segmenter::segment;

    fn activity(laps: Vec<Lap>) -> Activity {
        Activity {
            id: "5037219985".to_string(),
            name: "Track 6x1000".to_string(),
            start_time: DateTime::parse_from_rfc3339("2020-06-04T05:11:37+00:00").unwrap(),
            laps,
        }
    }

    fn workout() -> Activity {
        activity(vec![
            Lap::new(0, 2000.0, 660.0).unwrap().with_heart_rate(130, 140),
            Lap::new(1, 1000.0, 230.0).unwrap().with_heart_rate(165, 172),
            Lap::new(2, 200.0, 90.0).unwrap().with_heart_rate(140, 160),
            Lap::new(3, 1000.0, 226.0).unwrap().with_heart_rate(170, 178),
            Lap::new(4, 200.0, 95.0).unwrap(),
        ])
    }

    #[test]
    fn test_kind_totals() {
        let activity = workout();
        let segments = segment(&activity.laps, &ClassificationConfig::default()).unwrap();
        let summary = ActivitySummary::new(&activity, &segments);

        let i = &summary.interval;
        assert_eq!(i.lap_count, 2);
        assert_eq!(i.segment_count, 2);
        assert_eq!(i.total_distance, 2000.0);
        assert_eq!(i.total_duration, 456.0);
        assert_eq!(i.average_pace.unwrap().to_string(), "03:48");
        assert_eq!(i.fastest_pace.unwrap().secs_per_km(), 226.0);
        assert_eq!(i.slowest_pace.unwrap().secs_per_km(), 230.0);
        assert_eq!(i.min_lap_duration, Some(226.0));
        assert_eq!(i.max_lap_duration, Some(230.0));
        assert_eq!(i.avg_lap_distance(), Some(1000.0));
        assert_eq!(i.max_hr, Some(178));

        let r = &summary.recovery;
        assert_eq!(r.lap_count, 3);
        assert_eq!(r.segment_count, 3);
        assert_eq!(r.total_distance, 2400.0);
        assert_eq!(r.max_hr, Some(160));
        assert!(summary.has_intervals());
    }

    #[test]
    fn test_avg_hr_is_time_weighted() {
        let activity = activity(vec![
            Lap::new(0, 1000.0, 240.0).unwrap().with_heart_rate(150, 160),
            Lap::new(1, 1000.0, 120.0).unwrap().with_heart_rate(180, 185),
            Lap::new(2, 1000.0, 200.0).unwrap(),
        ]);
        let segments = segment(&activity.laps, &ClassificationConfig::default()).unwrap();
        let summary = ActivitySummary::new(&activity, &segments);
        // (150*4 + 180*2) / 6 minutes
        assert_eq!(summary.interval.avg_hr, Some(160));
        assert_eq!(summary.interval.lap_count, 3);
    }

    #[test]
    fn test_empty_kind_has_no_paces() {
        let activity = activity(vec![Lap::new(0, 5000.0, 1800.0).unwrap()]);
        let segments = segment(&activity.laps, &ClassificationConfig::default()).unwrap();
        let summary = ActivitySummary::new(&activity, &segments);

        assert!(!summary.has_intervals());
        assert_eq!(summary.interval.lap_count, 0);
        assert_eq!(summary.interval.segment_count, 0);
        assert!(summary.interval.average_pace.is_none());
        assert!(summary.interval.avg_lap_distance().is_none());
        assert!(summary.interval.avg_hr.is_none());

        let row = SummaryRow::from(&summary);
        assert_eq!(row.i_distance, 0.0);
        assert!(row.i_distance.is_sign_positive());
        assert!(row.i_time.is_sign_positive());
        assert!(row.i_avg_pace.is_none());
        assert_eq!(row.r_avg_pace.as_deref(), Some("06:00"));
        assert_eq!(row.time, "2020-06-04 05:11:37");

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&row).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let record = text.lines().nth(1).unwrap();
        assert!(record.starts_with("2020-06-04 05:11:37,5037219985,Track 6x1000,0.0,0.0,,0,0,"));
        assert!(!record.contains("-0.0"));
    }

    #[test]
    fn test_lap_rows_carry_segment() {
        let activity = workout();
        let segments = segment(&activity.laps, &ClassificationConfig::default()).unwrap();
        let rows = lap_rows(&activity, &segments);

        assert_eq!(rows.len(), 5);
        let tags: Vec<(u32, usize, LapKind)> =
            rows.iter().map(|r| (r.lap, r.segment, r.kind)).collect();
        assert_eq!(
            tags,
            vec![
                (0, 0, LapKind::Recovery),
                (1, 1, LapKind::Interval),
                (2, 2, LapKind::Recovery),
                (3, 3, LapKind::Interval),
                (4, 4, LapKind::Recovery),
            ]
        );
        assert_eq!(rows[1].pace.as_deref(), Some("03:50"));
        assert_eq!(rows[4].avg_hr, None);
    }
}
