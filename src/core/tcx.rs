//! Laps from Garmin Training Center (`.tcx`) files, which garminexport writes
//! next to each activity summary.

use crate::core::Lap;
use crate::utils::error::{EtlError, Result};
use roxmltree::{Document, Node};

/// Reads every `<Lap>` element in document order. Lap numbering starts at 0.
///
/// Only the lap's own `TotalTimeSeconds`, `DistanceMeters` and heart rate
/// children are read; trackpoints inside the lap carry their own
/// `DistanceMeters` and are ignored.
pub fn parse_laps(text: &str) -> Result<Vec<Lap>> {
    let doc = Document::parse(text)?;

    doc.descendants()
        .filter(|node| node.has_tag_name("Lap"))
        .enumerate()
        .map(|(position, node)| parse_lap(node, position as u32))
        .collect()
}

fn parse_lap(node: Node<'_, '_>, sequence_index: u32) -> Result<Lap> {
    Ok(Lap {
        sequence_index,
        distance_meters: number(node, "DistanceMeters", sequence_index)?,
        duration_seconds: number(node, "TotalTimeSeconds", sequence_index)?,
        avg_hr: heart_rate(node, "AverageHeartRateBpm", sequence_index)?,
        max_hr: heart_rate(node, "MaximumHeartRateBpm", sequence_index)?,
    })
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::trim)
}

fn number(node: Node<'_, '_>, name: &str, lap: u32) -> Result<f64> {
    let text = child_text(node, name).ok_or_else(|| EtlError::ProcessingError {
        message: format!("lap {} has no <{}>", lap, name),
    })?;

    text.parse().map_err(|_| EtlError::ProcessingError {
        message: format!("lap {}: <{}> is not a number: '{}'", lap, name, text),
    })
}

/// `<AverageHeartRateBpm><Value>152</Value></AverageHeartRateBpm>`, absent
/// when the activity was recorded without a heart rate monitor.
fn heart_rate(node: Node<'_, '_>, name: &str, lap: u32) -> Result<Option<u32>> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|bpm| child_text(bpm, "Value"))
        .map(|text| {
            text.parse().map_err(|_| EtlError::ProcessingError {
                message: format!("lap {}: <{}> is not a heart rate: '{}'", lap, name, text),
            })
        })
        .transpose()
}
