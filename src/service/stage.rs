use rusqlite::Connection;
use crate::error::{StageError, StageResult};
use crate::models::{ConstructionStage, NewStagePayload, StageStatus};
use crate::repo::StageRepo;
use crate::validation::validate;

/// Stage operations over an injected connection.
///
/// Concurrent writers to the same row are last-write-wins; there is no
/// version check.
pub struct StageService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> StageService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> StageResult<Vec<ConstructionStage>> {
        StageRepo::list_all(self.conn)
    }

    pub fn get(&self, id: i64) -> StageResult<Option<ConstructionStage>> {
        StageRepo::get_by_id(self.conn, id)
    }

    /// Validate, persist, and return the stored stage.
    /// Nothing is written when validation fails.
    pub fn post(&self, payload: &NewStagePayload) -> StageResult<ConstructionStage> {
        let valid = validate(payload).map_err(|e| {
            log::debug!("Rejected construction stage payload: {}", e);
            StageError::from(e)
        })?;
        let stage = StageRepo::create(self.conn, &valid)?;
        log::info!("Created construction stage {} ({})", stage.id, stage.status);
        Ok(stage)
    }

    /// Change a stage's status from a raw client value.
    /// Returns the status that was applied.
    pub fn update_status(&self, id: i64, raw_status: Option<&str>) -> StageResult<StageStatus> {
        let status = raw_status
            .and_then(StageStatus::from_str)
            .ok_or_else(|| {
                let raw = raw_status.unwrap_or_default().to_string();
                log::debug!("Rejected status '{}' for construction stage {}", raw, id);
                StageError::InvalidStatus(raw)
            })?;
        StageRepo::set_status(self.conn, id, status)?;
        log::info!("Construction stage {} status changed to {}", id, status);
        Ok(status)
    }

    /// Soft delete a stage
    pub fn delete(&self, id: i64) -> StageResult<()> {
        StageRepo::soft_delete(self.conn, id)?;
        log::info!("Construction stage {} marked as deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::ValidationError;
    use crate::utils::format_strict_utc;

    fn foundation() -> NewStagePayload {
        NewStagePayload {
            name: Some("Foundation".to_string()),
            start_date: Some("2023-05-01T08:00:00Z".to_string()),
            end_date: Some("2023-05-01T16:00:00Z".to_string()),
            duration_unit: Some("HOURS".to_string()),
            color: None,
            external_id: None,
            status: Some("NEW".to_string()),
        }
    }

    fn row_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM construction_stages", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_post_returns_persisted_stage() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);

        let stage = service.post(&foundation()).unwrap();
        assert!(stage.id > 0);
        assert_eq!(stage.name, "Foundation");
        assert_eq!(stage.duration, Some(8.0));
        assert_eq!(stage.status, StageStatus::New);
        assert_eq!(format_strict_utc(&stage.start_date), "2023-05-01T08:00:00Z");
        assert_eq!(service.get(stage.id).unwrap(), Some(stage));
    }

    #[test]
    fn test_post_validation_failure_writes_nothing() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);

        let mut payload = foundation();
        payload.status = Some("ACTIVE".to_string());
        let err = service.post(&payload).unwrap_err();
        assert!(matches!(err, StageError::Validation(ValidationError::InvalidStatus)));
        assert_eq!(row_count(&conn), 0);
    }

    #[test]
    fn test_update_status() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);
        let stage = service.post(&foundation()).unwrap();

        let applied = service.update_status(stage.id, Some("PLANNED")).unwrap();
        assert_eq!(applied, StageStatus::Planned);
        assert_eq!(service.get(stage.id).unwrap().unwrap().status, StageStatus::Planned);
    }

    #[test]
    fn test_update_status_rejects_unknown_value_without_mutation() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);
        let stage = service.post(&foundation()).unwrap();

        for raw in [Some("ACTIVE"), Some(""), Some("planned"), None] {
            let err = service.update_status(stage.id, raw).unwrap_err();
            assert_eq!(err.to_string(), "Invalid status value!");
        }
        assert_eq!(service.get(stage.id).unwrap().unwrap().status, StageStatus::New);
    }

    #[test]
    fn test_invalid_status_checked_before_lookup() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);
        let err = service.update_status(404, Some("BOGUS")).unwrap_err();
        assert!(matches!(err, StageError::InvalidStatus(_)));
    }

    #[test]
    fn test_update_status_unknown_id() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);
        let err = service.update_status(9, Some("PLANNED")).unwrap_err();
        assert!(matches!(err, StageError::NotFound(9)));
    }

    #[test]
    fn test_delete() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let service = StageService::new(&conn);
        let stage = service.post(&foundation()).unwrap();

        service.delete(stage.id).unwrap();
        let listed = service.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, StageStatus::Deleted);

        assert!(matches!(service.delete(stage.id + 1), Err(StageError::NotFound(_))));
    }
}
