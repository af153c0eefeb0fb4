//! HTTP surface: `GET /fetch` and `GET /analyse`.
//!
//! Every reply is a JSON envelope whose `statusCode` mirrors the HTTP
//! status. Successful replies carry `Cache-Control: public`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::analysis::{analyse_user, AnalysisError};
use crate::assistant::ask;
use crate::context::ServiceContext;
use crate::profile::fetch_user_profile;

/// Query string accepted by both routes.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeParams {
    /// Login to probe.
    pub username: Option<String>,
    /// Bypass the cache when present and not `0`/`false`.
    pub nocache: Option<String>,
    /// Question for the language model (`/analyse` only).
    pub query: Option<String>,
}

impl ProbeParams {
    fn username(&self) -> Option<&str> {
        self.username.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    fn bypass(&self) -> bool {
        self.nocache
            .as_deref()
            .is_some_and(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
    }

    fn question(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// An envelope before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Mirrored into both the HTTP status and `statusCode`.
    pub status: u16,
    /// JSON object body, `statusCode` included.
    pub body: Value,
}

impl Envelope {
    fn new(status: u16, mut fields: Map<String, Value>) -> Self {
        fields.insert("statusCode".to_string(), json!(status));
        Self { status, body: Value::Object(fields) }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("error".to_string(), Value::String(message.into()));
        Self::new(status, fields)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_success() {
            (status, [(header::CACHE_CONTROL, "public")], Json(self.body)).into_response()
        } else {
            (status, Json(self.body)).into_response()
        }
    }
}

fn to_fields<T: serde::Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => Map::from_iter([("data".to_string(), other)]),
        Err(e) => Map::from_iter([("error".to_string(), Value::String(e.to_string()))]),
    }
}

fn analysis_error(err: &AnalysisError) -> Envelope {
    let mut fields = Map::new();
    fields.insert("error".to_string(), Value::String(err.to_string()));
    if let AnalysisError::EmptyRepository { repository, .. } = err {
        fields.insert("analysedRepo".to_string(), Value::String(repository.clone()));
    }
    if let Some(profile) = err.profile() {
        fields.insert("userStats".to_string(), json!(profile));
    }
    Envelope::new(err.status_code(), fields)
}

/// Builds the `/fetch` envelope: the formatted profile under `data`.
pub async fn fetch_envelope(ctx: &ServiceContext, params: &ProbeParams) -> Envelope {
    let Some(username) = params.username() else {
        return Envelope::error(400, "Username not provided in the request");
    };
    match fetch_user_profile(ctx, username, params.bypass()).await {
        Ok(profile) => {
            let mut fields = Map::new();
            fields.insert("data".to_string(), json!(profile));
            Envelope::new(200, fields)
        }
        Err(e) => Envelope::error(e.status_code(), e.to_string()),
    }
}

/// Builds the `/analyse` envelope, answering `query` when one is given.
pub async fn analyse_envelope(ctx: &ServiceContext, params: &ProbeParams) -> Envelope {
    let Some(username) = params.username() else {
        return Envelope::error(400, "Username not provided in the request");
    };
    let result =
        match analyse_user(ctx, username, params.bypass(), ctx.settings.file_budget).await {
            Ok(result) => result,
            Err(e) => return analysis_error(&e),
        };

    let mut fields = to_fields(&result);
    let Some(question) = params.question() else {
        return Envelope::new(200, fields);
    };
    match ask(ctx, &result.summary, question).await {
        Ok(answer) => {
            fields.insert("answer".to_string(), json!(answer));
            Envelope::new(200, fields)
        }
        Err(e) => {
            tracing::warn!(error = %e, "question not answered");
            fields.insert("error".to_string(), Value::String(e.to_string()));
            Envelope::new(e.status_code(), fields)
        }
    }
}

async fn fetch_route(
    State(ctx): State<Arc<ServiceContext>>,
    Query(params): Query<ProbeParams>,
) -> Envelope {
    fetch_envelope(&ctx, &params).await
}

async fn analyse_route(
    State(ctx): State<Arc<ServiceContext>>,
    Query(params): Query<ProbeParams>,
) -> Envelope {
    analyse_envelope(&ctx, &params).await
}

async fn not_found() -> Envelope {
    Envelope::error(404, "404 - not found")
}

/// The application router over a shared context.
pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/fetch", get(fetch_route))
        .route("/analyse", get(analyse_route))
        .fallback(not_found)
        .with_state(ctx)
}

/// Binds `addr` and serves until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(ctx: ServiceContext, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving");
    axum::serve(listener, router(Arc::new(ctx))).await
}
