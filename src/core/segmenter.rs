use crate::core::classifier::{classify, ClassificationConfig};
use crate::core::pace::Pace;
use crate::domain::model::{Lap, LapKind};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

/// A maximal run of consecutive laps of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub kind: LapKind,
    pub laps: Vec<Lap>,
}

impl Segment {
    fn open(index: usize, kind: LapKind, lap: Lap) -> Self {
        Self {
            index,
            kind,
            laps: vec![lap],
        }
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn total_distance(&self) -> f64 {
        self.laps.iter().fold(0.0, |acc, lap| acc + lap.distance_meters)
    }

    pub fn total_duration(&self) -> f64 {
        self.laps.iter().fold(0.0, |acc, lap| acc + lap.duration_seconds)
    }

    /// Summed duration over summed distance, not the mean of lap paces.
    /// `None` when every lap has zero distance.
    pub fn average_pace(&self) -> Option<Pace> {
        Pace::from_distance_duration(self.total_distance(), self.total_duration())
    }
}

/// Groups the laps of one activity into segments of interval and recovery laps.
///
/// Laps are put in `sequence_index` order first; a repeated index is rejected
/// since the lap order would be ambiguous. An empty input yields no segments.
pub fn segment(laps: &[Lap], config: &ClassificationConfig) -> Result<Vec<Segment>> {
    let mut ordered: Vec<&Lap> = laps.iter().collect();
    ordered.sort_by_key(|lap| lap.sequence_index);

    if let Some(pair) = ordered
        .windows(2)
        .find(|pair| pair[0].sequence_index == pair[1].sequence_index)
    {
        return Err(EtlError::invalid_input(format!(
            "duplicate lap index {}",
            pair[0].sequence_index
        )));
    }

    let mut segments = Vec::new();
    let mut current: Option<Segment> = None;

    for lap in ordered {
        let kind = LapKind::from_interval(classify(lap, config)?);
        tracing::debug!(
            "lap {}: {:.0}m in {:.1}s -> {}",
            lap.sequence_index,
            lap.distance_meters,
            lap.duration_seconds,
            kind
        );

        current = Some(match current.take() {
            Some(mut open) if open.kind == kind => {
                open.laps.push(lap.clone());
                open
            }
            Some(closed) => {
                let next = Segment::open(closed.index + 1, kind, lap.clone());
                segments.push(closed);
                next
            }
            None => Segment::open(0, kind, lap.clone()),
        });
    }

    segments.extend(current);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps(data: &[(f64, f64)]) -> Vec<Lap> {
        data.iter()
            .enumerate()
            .map(|(i, (distance, duration))| Lap::new(i as u32, *distance, *duration).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_activity_has_no_segments() {
        let segments = segment(&[], &ClassificationConfig::default()).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_intervals_then_recovery() {
        let laps = laps(&[(1000.0, 240.0), (1000.0, 180.0), (1000.0, 185.0), (1000.0, 600.0)]);
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();

        assert_eq!(segments.len(), 2);

        let interval = &segments[0];
        assert_eq!(interval.kind, LapKind::Interval);
        assert_eq!(interval.index, 0);
        assert_eq!(interval.lap_count(), 3);
        assert_eq!(interval.total_distance(), 3000.0);
        assert_eq!(interval.total_duration(), 605.0);
        let pace = interval.average_pace().unwrap().secs_per_km();
        assert!((pace - 201.6667).abs() < 0.001);

        let recovery = &segments[1];
        assert_eq!(recovery.kind, LapKind::Recovery);
        assert_eq!(recovery.index, 1);
        assert_eq!(recovery.lap_count(), 1);
        assert_eq!(recovery.total_distance(), 1000.0);
        assert_eq!(recovery.average_pace().unwrap().secs_per_km(), 600.0);
    }

    #[test]
    fn test_single_slow_lap_is_one_recovery_segment() {
        let laps = laps(&[(500.0, 130.0)]);
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, LapKind::Recovery);
    }

    #[test]
    fn test_average_pace_is_distance_weighted() {
        // 400m @ 3:00/km and 2000m @ 4:00/km; mean of paces would be 3:30
        let laps = laps(&[(400.0, 72.0), (2000.0, 480.0)]);
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].average_pace().unwrap().secs_per_km(), 230.0);
    }

    #[test]
    fn test_segments_partition_laps() {
        let laps = laps(&[
            (200.0, 60.0),
            (400.0, 80.0),
            (400.0, 82.0),
            (200.0, 70.0),
            (0.0, 15.0),
            (1000.0, 230.0),
            (100.0, 15.0),
            (1200.0, 300.0),
        ]);
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();

        let rejoined: Vec<Lap> = segments.iter().flat_map(|s| s.laps.clone()).collect();
        assert_eq!(rejoined, laps);

        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
        let kinds: Vec<LapKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LapKind::Recovery,
                LapKind::Interval,
                LapKind::Recovery,
                LapKind::Interval,
                LapKind::Recovery,
                LapKind::Interval,
            ]
        );
    }

    #[test]
    fn test_laps_are_ordered_by_index() {
        let mut laps = laps(&[(1000.0, 240.0), (1000.0, 600.0), (1000.0, 200.0)]);
        laps.reverse();
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();

        let indices: Vec<u32> = segments
            .iter()
            .flat_map(|s| s.laps.iter().map(|lap| lap.sequence_index))
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let laps = vec![
            Lap::new(0, 1000.0, 240.0).unwrap(),
            Lap::new(0, 1000.0, 300.0).unwrap(),
        ];
        assert!(matches!(
            segment(&laps, &ClassificationConfig::default()),
            Err(EtlError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_all_zero_distance_segment_has_no_pace() {
        let laps = laps(&[(0.0, 30.0), (0.0, 45.0)]);
        let segments = segment(&laps, &ClassificationConfig::default()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].total_duration(), 75.0);
        assert!(segments[0].average_pace().is_none());
    }

    #[test]
    fn test_invalid_lap_propagates() {
        let mut laps = laps(&[(1000.0, 240.0), (1000.0, 300.0)]);
        laps[1].distance_meters = -1.0;
        assert!(segment(&laps, &ClassificationConfig::default()).is_err());
    }
}
