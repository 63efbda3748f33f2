//! Stages - a ledger of construction stages backed by SQLite
//!
//! This library provides:
//! - Database connection management and migrations
//! - The construction stage model and its closed status/unit enums
//! - Payload validation and duration derivation
//! - The stage repository and service
//! - A transport-agnostic dispatcher for the `/stages` resource
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use stages::db::DbConnection;
//! use stages::models::NewStagePayload;
//! use stages::service::StageService;
//!
//! fn main() -> anyhow::Result<()> {
//!     let conn = DbConnection::connect()?;
//!     let service = StageService::new(&conn);
//!     let stage = service.post(&NewStagePayload {
//!         name: Some("Foundation".to_string()),
//!         start_date: Some("2023-05-01T08:00:00Z".to_string()),
//!         end_date: Some("2023-05-01T16:00:00Z".to_string()),
//!         duration_unit: Some("HOURS".to_string()),
//!         status: Some("NEW".to_string()),
//!         ..Default::default()
//!     })?;
//!     assert_eq!(stage.duration, Some(8.0));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod service;
pub mod utils;
pub mod validation;
