use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::utils::date::{strict_utc, strict_utc_option};

/// Construction stage status
///
/// Closed set: a stage is created as NEW or PLANNED and leaves the ledger
/// only by moving to DELETED (rows are never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StageStatus {
    New,
    Planned,
    Deleted,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::New => "NEW",
            StageStatus::Planned => "PLANNED",
            StageStatus::Deleted => "DELETED",
        }
    }

    /// Membership check: exact, case-sensitive match on the wire name
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(StageStatus::New),
            "PLANNED" => Some(StageStatus::Planned),
            "DELETED" => Some(StageStatus::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a stage duration is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DurationUnit {
    Hours,
    #[default]
    Days,
    Weeks,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Hours => "HOURS",
            DurationUnit::Days => "DAYS",
            DurationUnit::Weeks => "WEEKS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOURS" => Some(DurationUnit::Hours),
            "DAYS" => Some(DurationUnit::Days),
            "WEEKS" => Some(DurationUnit::Weeks),
            _ => None,
        }
    }

    /// Seconds in one unit
    pub fn seconds(&self) -> i64 {
        match self {
            DurationUnit::Hours => 3_600,
            DurationUnit::Days => 86_400,
            DurationUnit::Weeks => 604_800,
        }
    }
}

/// Construction stage record as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionStage {
    pub id: i64,
    pub name: String,
    #[serde(with = "strict_utc")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "strict_utc_option")]
    pub end_date: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub duration_unit: Option<DurationUnit>,
    pub color: Option<String>,
    pub external_id: Option<String>,
    pub status: StageStatus,
}

/// Inbound body of a stage creation request.
///
/// Everything is optional here so that missing or null fields reach the
/// validator instead of failing at decode time. A client `duration` is not
/// part of the payload and is dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewStagePayload {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration_unit: Option<String>,
    pub color: Option<String>,
    pub external_id: Option<String>,
    pub status: Option<String>,
}
