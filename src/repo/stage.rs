use rusqlite::{types::Type, Connection, OptionalExtension, Row};
use crate::error::{StageError, StageResult};
use crate::models::{ConstructionStage, DurationUnit, StageStatus};
use crate::utils::from_epoch_secs;
use crate::validation::ValidStage;

const STAGE_COLUMNS: &str =
    "ID, name, start_date, end_date, duration, durationUnit, color, externalId, status";

/// Construction stage repository for database operations
pub struct StageRepo;

impl StageRepo {
    /// Insert a validated stage and return the stored row
    pub fn create(conn: &Connection, stage: &ValidStage) -> StageResult<ConstructionStage> {
        conn.execute(
            "INSERT INTO construction_stages
                (name, start_date, end_date, duration, durationUnit, color, externalId, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                stage.name,
                stage.start_date.timestamp(),
                stage.end_date.map(|end| end.timestamp()),
                stage.duration,
                stage.duration_unit.map(|unit| unit.as_str()),
                stage.color,
                stage.external_id,
                stage.status.as_str(),
            ],
        )
        .map_err(StageError::persistence("Failed to create construction stage."))?;

        let id = conn.last_insert_rowid();
        log::debug!("Inserted construction stage {}", id);

        // Re-read so callers see what was stored, not what was sent
        Self::get_by_id(conn, id)?.ok_or_else(|| StageError::Persistence {
            message: format!("Failed to read back construction stage with ID {}.", id),
            source: None,
        })
    }

    /// Get stage by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> StageResult<Option<ConstructionStage>> {
        let sql = format!("SELECT {} FROM construction_stages WHERE ID = ?1", STAGE_COLUMNS);
        conn.query_row(&sql, [id], row_to_stage)
            .optional()
            .map_err(StageError::persistence(format!(
                "Failed to load construction stage with ID {}.",
                id
            )))
    }

    /// List every stage, deleted ones included, ordered by ID
    pub fn list_all(conn: &Connection) -> StageResult<Vec<ConstructionStage>> {
        let load_failed = || StageError::persistence("Failed to list construction stages.");
        let sql = format!("SELECT {} FROM construction_stages ORDER BY ID", STAGE_COLUMNS);

        let mut stmt = conn.prepare(&sql).map_err(load_failed())?;
        let rows = stmt.query_map([], row_to_stage).map_err(load_failed())?;

        let mut stages = Vec::new();
        for row in rows {
            stages.push(row.map_err(load_failed())?);
        }
        Ok(stages)
    }

    /// Set the status of a stage.
    ///
    /// Fails with `NotFound` when no row has this ID. Setting a status the row
    /// already has still matches the row and succeeds.
    pub fn set_status(conn: &Connection, id: i64, status: StageStatus) -> StageResult<()> {
        let updated = conn
            .execute(
                "UPDATE construction_stages SET status = ?1 WHERE ID = ?2",
                rusqlite::params![status.as_str(), id],
            )
            .map_err(StageError::persistence(format!(
                "Failed to update construction stage with ID {}.",
                id
            )))?;

        if updated == 0 {
            return Err(StageError::NotFound(id));
        }

        log::debug!("Construction stage {} status set to {}", id, status);
        Ok(())
    }

    /// Soft delete: the row stays, its status becomes DELETED
    pub fn soft_delete(conn: &Connection, id: i64) -> StageResult<()> {
        match Self::set_status(conn, id, StageStatus::Deleted) {
            Err(StageError::Persistence { source, .. }) => Err(StageError::Persistence {
                message: format!("Failed to delete construction stage with ID {}.", id),
                source,
            }),
            other => other,
        }
    }
}

fn conversion_error(idx: usize, kind: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, kind, message.into())
}

fn row_to_stage(row: &Row) -> rusqlite::Result<ConstructionStage> {
    let start_secs: i64 = row.get(2)?;
    let start_date = from_epoch_secs(start_secs).ok_or_else(|| {
        conversion_error(2, Type::Integer, format!("start_date out of range: {}", start_secs))
    })?;

    let end_date = match row.get::<_, Option<i64>>(3)? {
        Some(secs) => Some(from_epoch_secs(secs).ok_or_else(|| {
            conversion_error(3, Type::Integer, format!("end_date out of range: {}", secs))
        })?),
        None => None,
    };

    let duration_unit = match row.get::<_, Option<String>>(5)? {
        Some(raw) => Some(DurationUnit::from_str(&raw).ok_or_else(|| {
            conversion_error(5, Type::Text, format!("unknown durationUnit '{}'", raw))
        })?),
        None => None,
    };

    let raw_status: String = row.get(8)?;
    let status = StageStatus::from_str(&raw_status).ok_or_else(|| {
        conversion_error(8, Type::Text, format!("unknown status '{}'", raw_status))
    })?;

    Ok(ConstructionStage {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date,
        end_date,
        duration: row.get(4)?,
        duration_unit,
        color: row.get(6)?,
        external_id: row.get(7)?,
        status,
    })
}
