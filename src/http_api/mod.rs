use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CALENDAR_MIME_TYPE, HOOK_SIZES, HookSize, PersistenceError, PlanSettings, Planner,
    PlannerError, PresetStore, ProjectSpec, SessionSlot, closest_us,
    project::{BeanieSizing, BlanketLayout},
};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
    presets: Arc<dyn PresetStore + Send + Sync>,
    clock: Clock,
}

impl AppState {
    pub fn new<S>(planner: Planner, presets: S) -> Self
    where
        S: PresetStore + Send + Sync + 'static,
    {
        Self {
            planner: Arc::new(RwLock::new(planner)),
            presets: Arc::new(presets),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the source of calendar `DTSTAMP` values.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::NotFound(name) => {
                ApiError::NotFound(format!("preset '{name}' not found"))
            }
            PersistenceError::InvalidData(message) => ApiError::Invalid(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct SessionsBody {
    sessions: Vec<SessionSlot>,
    requested_sessions: u32,
    per_session: u32,
    total_work: u32,
    degenerate: bool,
    unassigned_work: u32,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct SizesBody {
    beanie: BeanieSizing,
    blanket: BlanketLayout,
    rectangle_area_in2: f64,
    rectangle_yardage: f64,
}

#[derive(Debug, Deserialize)]
struct ClosestHookQuery {
    mm: f64,
}

#[derive(Debug, Deserialize)]
struct SavePresetPayload {
    name: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/project", get(get_project).put(update_project))
        .route("/project/sizes", get(project_sizes))
        .route("/hooks", get(list_hooks))
        .route("/hooks/closest", get(closest_hook))
        .route("/sessions", get(list_sessions))
        .route("/calendar.ics", get(download_calendar))
        .route("/presets", get(list_presets).post(save_preset))
        .route("/presets/:name", get(get_preset).delete(delete_preset))
        .route("/presets/:name/apply", post(apply_preset))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_settings(State(state): State<AppState>) -> Json<PlanSettings> {
    let planner = state.planner();
    let settings = planner.read().settings.clone();
    Json(settings)
}

async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<PlanSettings>,
) -> Result<Json<PlanSettings>, ApiError> {
    settings
        .validate()
        .map_err(|err| ApiError::Invalid(err.to_string()))?;
    let planner = state.planner();
    planner.write().settings = settings.clone();
    Ok(Json(settings))
}

async fn get_project(State(state): State<AppState>) -> Json<ProjectSpec> {
    let planner = state.planner();
    let project = planner.read().project;
    Json(project)
}

async fn update_project(
    State(state): State<AppState>,
    Json(project): Json<ProjectSpec>,
) -> Result<Json<ProjectSpec>, ApiError> {
    project
        .validate()
        .map_err(|err| ApiError::Invalid(err.to_string()))?;
    let planner = state.planner();
    planner.write().project = project;
    Ok(Json(project))
}

async fn project_sizes(State(state): State<AppState>) -> Json<SizesBody> {
    let project = state.planner().read().project;
    Json(SizesBody {
        beanie: project.beanie.sizing(&project.gauge),
        blanket: project.blanket.layout(),
        rectangle_area_in2: project.rectangle.area_in2(),
        rectangle_yardage: project.rectangle.yardage(&project.gauge),
    })
}

async fn list_hooks() -> Json<&'static [HookSize]> {
    Json(HOOK_SIZES.as_slice())
}

async fn closest_hook(Query(query): Query<ClosestHookQuery>) -> Result<Json<HookSize>, ApiError> {
    if !query.mm.is_finite() || query.mm <= 0.0 {
        return Err(ApiError::Invalid(format!(
            "mm must be a positive number (got {})",
            query.mm
        )));
    }
    Ok(Json(closest_us(query.mm)))
}

async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionsBody>, ApiError> {
    let planner = state.planner();
    let body = {
        let guard = planner.read();
        let plan = guard.session_plan()?;
        SessionsBody {
            sessions: guard.slots_for(&plan)?,
            requested_sessions: plan.requested_sessions,
            per_session: plan.per_session,
            total_work: plan.total_work,
            degenerate: plan.is_degenerate(),
            unassigned_work: plan.unassigned_work(),
            first_date: plan.first_date(),
            last_date: plan.last_date(),
        }
    };
    Ok(Json(body))
}

async fn download_calendar(State(state): State<AppState>) -> Result<Response, ApiError> {
    let generated_at = (state.clock)();
    let planner = state.planner();
    let (file_name, ics) = {
        let guard = planner.read();
        let document = guard.calendar(generated_at)?;
        (guard.file_name(), document.to_ics())
    };
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, format!("{CALENDAR_MIME_TYPE}; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    )
        .into_response())
}

async fn list_presets(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.presets.list_presets()?))
}

async fn save_preset(
    State(state): State<AppState>,
    Json(payload): Json<SavePresetPayload>,
) -> Result<(StatusCode, Json<Planner>), ApiError> {
    let current = state.planner().read().clone();
    state.presets.save_preset(&payload.name, &current)?;
    Ok((StatusCode::CREATED, Json(current)))
}

async fn get_preset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Planner>, ApiError> {
    match state.presets.load_preset(&name)? {
        Some(preset) => Ok(Json(preset)),
        None => Err(ApiError::not_found(format!("preset '{name}' not found"))),
    }
}

async fn delete_preset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.presets.delete_preset(&name)? {
        return Err(ApiError::not_found(format!("preset '{name}' not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_preset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Planner>, ApiError> {
    let preset = state.presets.fetch_preset(&name)?;
    {
        let planner = state.planner();
        *planner.write() = preset.clone();
    }
    tracing::info!(preset = %name, "applied preset");
    Ok(Json(preset))
}
