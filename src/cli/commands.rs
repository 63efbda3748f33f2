use clap::{Parser, Subcommand};
use crate::api::{self, Method, Request};
use crate::cli::error::{user_error, user_error_with_context, validate_stage_id};
use crate::cli::output::{format_stage_summary, format_stage_table, get_terminal_width, is_tty};
use crate::db::DbConnection;
use crate::error::{StageError, StageResult};
use crate::models::{ConstructionStage, NewStagePayload};
use crate::service::StageService;
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "stages")]
#[command(about = "Construction stage ledger - validated stage records backed by SQLite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all construction stages
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a single construction stage
    Show {
        /// Stage ID
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Create a construction stage (duration is derived from the dates)
    Add {
        /// Stage name
        #[arg(long)]
        name: String,
        /// Start date, e.g. 2022-12-31T14:59:00Z
        #[arg(long)]
        start: String,
        /// End date in the same format (omit for an open-ended stage)
        #[arg(long)]
        end: Option<String>,
        /// Duration unit: HOURS, DAYS or WEEKS (defaults to DAYS)
        #[arg(long)]
        unit: Option<String>,
        /// HEX color, e.g. #FF0000
        #[arg(long)]
        color: Option<String>,
        /// External reference ID
        #[arg(long = "external-id")]
        external_id: Option<String>,
        /// Initial status: NEW, PLANNED or DELETED
        #[arg(long, default_value = "NEW")]
        status: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Change the status of a construction stage
    Status {
        /// Stage ID
        id: String,
        /// New status: NEW, PLANNED or DELETED
        status: String,
    },
    /// Soft delete a construction stage (status becomes DELETED)
    Delete {
        /// Stage ID
        id: String,
    },
    /// Send a request to the /stages resource, e.g. `request PATCH /stages/1 '{"status":"PLANNED"}'`
    Request {
        /// GET, POST, PUT, PATCH or DELETE
        method: String,
        /// Resource path, e.g. /stages or /stages/1
        path: String,
        /// JSON request body
        body: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let conn = DbConnection::connect()
        .context("Failed to connect to database")?;
    let service = StageService::new(&conn);

    match cli.command {
        Commands::List { json } => handle_list(&service, json),
        Commands::Show { id, json } => handle_show(&service, &id, json),
        Commands::Add { name, start, end, unit, color, external_id, status, json } => {
            let payload = NewStagePayload {
                name: Some(name),
                start_date: Some(start),
                end_date: end,
                duration_unit: unit,
                color,
                external_id,
                status: Some(status),
            };
            handle_add(&service, &payload, json)
        }
        Commands::Status { id, status } => {
            let id = parse_id(&id);
            let applied = check(service.update_status(id, Some(status.as_str())))?;
            println!("Patching construction with id: {} status changed to {}!", id, applied);
            Ok(())
        }
        Commands::Delete { id } => {
            let id = parse_id(&id);
            check(service.delete(id))?;
            println!("Patching construction with id: {} status changed to deleted!", id);
            Ok(())
        }
        Commands::Request { method, path, body } => handle_request(&service, &method, path, body),
    }
}

fn parse_id(id_str: &str) -> i64 {
    match validate_stage_id(id_str) {
        Ok(id) => id,
        Err(e) => user_error(&e),
    }
}

/// User errors exit with code 1; storage failures propagate as internal errors
fn check<T>(result: StageResult<T>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_user_error() => user_error(&e.to_string()),
        Err(e) => Err(e.into()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_list(service: &StageService, json: bool) -> Result<()> {
    let stages = check(service.list())?;

    if json {
        return print_json(&stages);
    }

    let width = if is_tty() { get_terminal_width() } else { usize::MAX };
    println!("{}", format_stage_table(&stages, width).trim_end());
    Ok(())
}

fn handle_show(service: &StageService, id_str: &str, json: bool) -> Result<()> {
    let id = parse_id(id_str);
    let stage = check(service.get(id))?;

    if json {
        return print_json(&stage);
    }

    match stage {
        Some(stage) => {
            print!("{}", format_stage_summary(&stage));
            Ok(())
        }
        None => user_error(&StageError::NotFound(id).to_string()),
    }
}

fn handle_add(service: &StageService, payload: &NewStagePayload, json: bool) -> Result<()> {
    let stage: ConstructionStage = check(service.post(payload))?;

    if json {
        return print_json(&stage);
    }

    println!("Created construction stage {} (id: {})", stage.name, stage.id);
    print!("{}", format_stage_summary(&stage));
    Ok(())
}

fn handle_request(service: &StageService, method: &str, path: String, body: Option<String>) -> Result<()> {
    let method = match Method::from_str(method) {
        Some(method) => method,
        None => user_error(&format!(
            "Unsupported method '{}'. Use GET, POST, PUT, PATCH or DELETE.",
            method
        )),
    };

    let response = api::handle(service, &Request::new(method, path, body));
    log::debug!("Response {} ({})", response.status, response.content_type.as_str());

    if response.is_success() {
        println!("{}", response.body);
        Ok(())
    } else {
        user_error_with_context(&response.body, &format!("HTTP {}", response.status))
    }
}
