//! Validation and derivation for stage creation payloads
//!
//! [`validate`] is pure: it either rejects a payload with the first failing
//! [`ValidationError`] or returns a [`ValidStage`] whose `duration` has been
//! recomputed from the dates and unit. Checks run in a fixed order so the
//! same bad payload always yields the same message.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use crate::error::ValidationError;
use crate::models::{DurationUnit, NewStagePayload, StageStatus};
use crate::utils::{derive_duration, parse_strict_utc};

/// Maximum stored length of `name`, in bytes
pub const MAX_NAME_LEN: usize = 255;

/// Maximum stored length of `externalId`, in bytes
pub const MAX_EXTERNAL_ID_LEN: usize = 255;

/// A payload that passed every check, ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ValidStage {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub color: Option<String>,
    pub external_id: Option<String>,
    pub status: StageStatus,
}

fn color_pattern() -> &'static Regex {
    static COLOR: OnceLock<Regex> = OnceLock::new();
    COLOR.get_or_init(|| {
        Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("Valid color pattern")
    })
}

/// Validate a creation payload and derive its duration
pub fn validate(payload: &NewStagePayload) -> Result<ValidStage, ValidationError> {
    let name = payload.name.clone().unwrap_or_default();
    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }

    let start_date = payload
        .start_date
        .as_deref()
        .and_then(parse_strict_utc)
        .ok_or(ValidationError::InvalidStartDate)?;

    let end_date = match payload.end_date.as_deref() {
        Some(raw) => Some(parse_strict_utc(raw).ok_or(ValidationError::InvalidEndDate)?),
        None => None,
    };

    if let Some(end) = &end_date {
        if *end < start_date {
            return Err(ValidationError::EndBeforeStart);
        }
    }

    // Absent and empty both mean "use the default unit"
    let duration_unit = match payload.duration_unit.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(DurationUnit::from_str(raw).ok_or(ValidationError::InvalidDurationUnit)?),
    };

    if let Some(color) = &payload.color {
        if !color_pattern().is_match(color) {
            return Err(ValidationError::InvalidColor);
        }
    }

    if let Some(external_id) = &payload.external_id {
        if external_id.len() > MAX_EXTERNAL_ID_LEN {
            return Err(ValidationError::ExternalIdTooLong);
        }
    }

    let status = payload
        .status
        .as_deref()
        .and_then(StageStatus::from_str)
        .ok_or(ValidationError::InvalidStatus)?;

    let duration = derive_duration(&start_date, end_date.as_ref(), duration_unit);

    Ok(ValidStage {
        name,
        start_date,
        end_date,
        duration,
        duration_unit,
        color: payload.color.clone(),
        external_id: payload.external_id.clone(),
        status,
    })
}
