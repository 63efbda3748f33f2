//! Transport-agnostic dispatcher for the `/stages` resource
//!
//! [`handle`] turns a method, path and optional body into a status code and
//! body. It owns no sockets; an HTTP server (or the `request` CLI command)
//! feeds it requests and writes the [`Response`] back.

use serde::Serialize;
use crate::error::StageError;
use crate::models::NewStagePayload;
use crate::service::StageService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: ContentType,
    pub body: String,
}

impl Response {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: ContentType::Json,
                body,
            },
            Err(e) => {
                log::error!("Failed to serialize response body: {}", e);
                Self::text(500, "Failed to serialize response.")
            }
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: ContentType::Text,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Store and validation failures are all reported as bad requests
impl From<StageError> for Response {
    fn from(err: StageError) -> Self {
        if !err.is_user_error() {
            log::error!("{:?}", err);
        }
        Response::text(400, err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Collection,
    Item(i64),
}

fn route(path: &str) -> Option<Route> {
    let path = path.split('?').next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["stages"] => Some(Route::Collection),
        ["stages", id] => match id.parse::<i64>() {
            Ok(id) if id > 0 => Some(Route::Item(id)),
            _ => None,
        },
        _ => None,
    }
}

/// Dispatch one request against the stage service
pub fn handle(service: &StageService, request: &Request) -> Response {
    log::debug!("{:?} {}", request.method, request.path);

    let Some(target) = route(&request.path) else {
        return Response::text(404, "Not found.");
    };

    let result = match (target, request.method) {
        (Route::Collection, Method::Get) => service.list().map(|stages| Response::json(200, &stages)),
        (Route::Collection, Method::Post) => {
            let payload: NewStagePayload = match parse_body(request) {
                Ok(payload) => payload,
                Err(response) => return response,
            };
            service.post(&payload).map(|stage| Response::json(201, &stage))
        }
        (Route::Item(id), Method::Get) => service.get(id).map(|stage| Response::json(200, &stage)),
        (Route::Item(id), Method::Patch) => {
            let body: serde_json::Value = match parse_body(request) {
                Ok(body) => body,
                Err(response) => return response,
            };
            let raw_status = body.get("status").and_then(|s| s.as_str());
            service.update_status(id, raw_status).map(|status| {
                Response::text(
                    200,
                    format!("Patching construction with id: {} status changed to {}!", id, status),
                )
            })
        }
        (Route::Item(id), Method::Delete) => service.delete(id).map(|()| {
            Response::text(
                200,
                format!("Patching construction with id: {} status changed to deleted!", id),
            )
        }),
        _ => return Response::text(405, "Method not allowed."),
    };

    result.unwrap_or_else(Response::from)
}

fn parse_body<T: serde::de::DeserializeOwned>(request: &Request) -> Result<T, Response> {
    let body = request.body.as_deref().unwrap_or_default();
    serde_json::from_str(body).map_err(|e| {
        log::debug!("Malformed request body for {}: {}", request.path, e);
        Response::text(400, "Invalid JSON body.")
    })
}
