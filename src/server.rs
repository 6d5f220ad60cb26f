//! HTTP server
//!
//! Routes:
//! - `GET /` - embedded control panel
//! - `GET /api/sensors` - raw `sensors` output
//! - `GET /api/fan` - current PWM duty as `{"speed": n}`
//! - `POST /api/fan` - set PWM duty on both channels

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::api::{FanRequest, FanSpeedResponse, StatusResponse};
use crate::commands::{
    parse_fan_speed, read_fan_speed_command, set_fan_speed_command, FanSpeed, SENSORS_COMMAND,
};
use crate::error::BridgeError;
use crate::executor::RemoteExecutor;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<RemoteExecutor>,
}

impl AppState {
    pub fn new(executor: Arc<RemoteExecutor>) -> Self {
        Self { executor }
    }
}

/// Error response with a plain-text body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method not allowed".to_string(),
        }
    }

    /// Client errors keep their message; anything else is logged and
    /// replaced by `public` so remote detail never reaches the client.
    fn from_bridge(err: BridgeError, public: &str) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }
        error!("{}: {}", public, err);
        Self::internal(public)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Create the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // `get` also answers HEAD, which would run the remote command
        .route(
            "/api/sensors",
            get(sensors)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/fan",
            get(get_fan)
                .head(method_not_allowed)
                .post(set_fan)
                .fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn sensors(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .executor
        .run(SENSORS_COMMAND)
        .await
        .map_err(|e| ApiError::from_bridge(e, "Failed to get sensors output"))
}

async fn get_fan(State(state): State<AppState>) -> Result<Json<FanSpeedResponse>, ApiError> {
    const FAILURE: &str = "Failed to get fan speed";

    let output = state
        .executor
        .run(&read_fan_speed_command())
        .await
        .map_err(|e| ApiError::from_bridge(e, FAILURE))?;
    let speed = parse_fan_speed(&output).map_err(|e| ApiError::from_bridge(e, FAILURE))?;

    Ok(Json(speed.into()))
}

async fn set_fan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    // Parsed by hand so malformed bodies are a 400 regardless of content type
    let request: FanRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejecting fan request body: {}", e);
        ApiError::bad_request("Invalid JSON")
    })?;

    let speed = FanSpeed::try_from(request.speed)
        .map_err(|e| ApiError::from_bridge(e, "Invalid fan speed"))?;

    state
        .executor
        .run(&set_fan_speed_command(speed))
        .await
        .map_err(|e| ApiError::from_bridge(e, "Failed to set fan speed"))?;

    info!("Fan speed set to {}", speed);
    Ok(Json(StatusResponse::success("Fan speed updated")))
}
