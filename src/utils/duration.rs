// Duration derivation for construction stages

use chrono::{DateTime, Utc};
use crate::models::DurationUnit;

/// Derive a stage duration from its date span.
///
/// The span is the difference of epoch seconds, divided by the seconds in
/// `unit` (days when no unit is given). Open-ended stages have no duration.
pub fn derive_duration(
    start: &DateTime<Utc>,
    end: Option<&DateTime<Utc>>,
    unit: Option<DurationUnit>,
) -> Option<f64> {
    let end = end?;
    let span_secs = end.timestamp() - start.timestamp();
    let unit = unit.unwrap_or_default();
    Some(span_secs as f64 / unit.seconds() as f64)
}

/// Render a duration for display, dropping a trailing `.0`
pub fn format_duration(duration: Option<f64>, unit: Option<DurationUnit>) -> String {
    match duration {
        Some(value) => {
            let unit = unit.unwrap_or_default();
            if value.fract() == 0.0 {
                format!("{:.0} {}", value, unit.as_str())
            } else {
                format!("{:.2} {}", value, unit.as_str())
            }
        }
        None => "-".to_string(),
    }
}
