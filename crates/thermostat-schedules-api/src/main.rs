//! Thermostat Schedules - schedule editing API server

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use schedule_editor::{CreateScheduleRequest, EditError, ScheduleBook, ScheduleOrigin, Step};
use schedule_model::{
    ConflictDescriptor, DaySet, FanMode, ScheduleId, ScheduleMode, ScheduleUpdate, SetpointField,
    TimeOfDay, Weekday,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod websocket;

use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<ScheduleBook>,
}

/// API response wrapper using serde_json::Value for flexibility
#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or(serde_json::Value::Null)),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn ok<T: Serialize>(data: T) -> ApiResult {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// Map an edit rejection to an HTTP status
fn edit_error(e: &EditError) -> ApiResult {
    let status = match e {
        EditError::NotFound(_) => StatusCode::NOT_FOUND,
        EditError::AwayModeActive
        | EditError::Incomplete
        | EditError::Conflict
        | EditError::NotSavable(_) => StatusCode::CONFLICT,
        EditError::SetpointOutOfRange { .. }
        | EditError::NoSetpoint { .. }
        | EditError::ConflictTimeIncomplete
        | EditError::Model(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ApiResponse::error(e.to_string())))
}

fn respond<T: Serialize>(result: Result<T, EditError>) -> ApiResult {
    match result {
        Ok(data) => ok(data),
        Err(e) => edit_error(&e),
    }
}

/// System info response
#[derive(Serialize)]
struct SystemInfo {
    name: String,
    version: String,
}

/// Schedule list filter
#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    origin: Option<ScheduleOrigin>,
}

/// Batch of field edits
#[derive(Deserialize)]
struct UpdateScheduleRequest {
    updates: Vec<ScheduleUpdate>,
}

/// Away mode switch
#[derive(Deserialize, Serialize)]
struct AwayModeRequest {
    active: bool,
}

/// Get system info
async fn system_info() -> impl IntoResponse {
    Json(ApiResponse::success(SystemInfo {
        name: "Thermostat Schedules".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// List schedules, newest first
async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    Json(ApiResponse::success(state.book.list(query.origin)))
}

/// Create a schedule from explicit fields
async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<CreateScheduleRequest>,
) -> impl IntoResponse {
    match state.book.create(req) {
        Ok(view) => (StatusCode::CREATED, Json(ApiResponse::success(view))),
        Err(e) => edit_error(&e),
    }
}

/// Create an empty schedule
async fn create_blank_schedule(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(state.book.create_blank())),
    )
}

/// Get a specific schedule
async fn get_schedule(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.book.get(&ScheduleId::from(id)) {
        Some(view) => ok(view),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Schedule not found")),
        ),
    }
}

/// Apply field edits
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateScheduleRequest>,
) -> impl IntoResponse {
    respond(state.book.update(&ScheduleId::from(id), &req.updates))
}

/// Commit a schedule
async fn save_schedule(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    respond(state.book.commit(&ScheduleId::from(id)))
}

/// Enable a schedule
async fn enable_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(state.book.enable(&ScheduleId::from(id)))
}

/// Disable a schedule
async fn disable_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(state.book.disable(&ScheduleId::from(id)))
}

/// Nudge a setpoint up or down
async fn adjust_setpoint(
    State(state): State<AppState>,
    Path((id, field, step)): Path<(String, SetpointField, Step)>,
) -> impl IntoResponse {
    respond(state.book.adjust(&ScheduleId::from(id), field, step))
}

/// Supply a conflicting event
async fn put_conflict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(conflict): Json<ConflictDescriptor>,
) -> impl IntoResponse {
    respond(state.book.set_conflict(&ScheduleId::from(id), Some(conflict)))
}

/// Clear the conflicting event
async fn delete_conflict(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(state.book.set_conflict(&ScheduleId::from(id), None))
}

/// Delete a schedule
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(state.book.delete(&ScheduleId::from(id)))
}

/// Get away mode
async fn get_away_mode(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(AwayModeRequest {
        active: state.book.away_mode(),
    }))
}

/// Switch away mode
async fn put_away_mode(
    State(state): State<AppState>,
    Json(req): Json<AwayModeRequest>,
) -> impl IntoResponse {
    state.book.set_away_mode(req.active);
    Json(ApiResponse::success(req))
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| websocket::handle_socket(socket, state))
}

/// Health check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the router
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/system/info", get(system_info))
        .route(
            "/api/v1/schedules",
            get(list_schedules).post(create_schedule),
        )
        .route("/api/v1/schedules/blank", post(create_blank_schedule))
        .route(
            "/api/v1/schedules/:id",
            get(get_schedule)
                .patch(update_schedule)
                .delete(delete_schedule),
        )
        .route("/api/v1/schedules/:id/save", post(save_schedule))
        .route("/api/v1/schedules/:id/enable", post(enable_schedule))
        .route("/api/v1/schedules/:id/disable", post(disable_schedule))
        .route(
            "/api/v1/schedules/:id/setpoints/:field/:step",
            post(adjust_setpoint),
        )
        .route(
            "/api/v1/schedules/:id/conflict",
            put(put_conflict).delete(delete_conflict),
        )
        .route("/api/v1/away-mode", get(get_away_mode).put(put_away_mode))
        // WebSocket
        .route("/ws", get(ws_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Populate the book with a blank draft and a saved cooling schedule
fn seed_demo(book: &ScheduleBook) -> Result<(), EditError> {
    let cool = book.create(CreateScheduleRequest {
        mode: Some(ScheduleMode::Cool),
        temperature: Some(73),
        days: [Weekday::Mon, Weekday::Wed, Weekday::Fri]
            .into_iter()
            .collect(),
        time: TimeOfDay::parse("08:00 AM")?,
        fan_mode: Some(FanMode::Auto),
        ..Default::default()
    })?;
    book.commit(&cool.schedule.id)?;

    book.create(CreateScheduleRequest {
        days: DaySet::EMPTY,
        fan_mode: Some(FanMode::Auto),
        enabled: false,
        ..Default::default()
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "thermostat_schedules_api=debug,schedule_editor=debug,info".into()
            }),
        )
        .init();

    tracing::info!("Starting Thermostat Schedules API server");

    let config = Config::from_env()?;
    tracing::debug!("Configuration: {:?}", config);

    let book = Arc::new(ScheduleBook::new());
    if config.seed_demo {
        seed_demo(&book)?;
        tracing::info!("Seeded {} demo schedules", book.len());
    }
    if config.away_mode {
        book.set_away_mode(true);
    }

    let app = router(AppState { book });

    // Start server
    tracing::info!("Listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
