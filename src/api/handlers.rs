//! REST API handlers for the broadcast guide
//!
//! These handlers use the shared GuideService.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::service::{GuideService, ScheduleView, Stats};
use crate::error::{LocationError, ReviewError, RuleError};
use crate::location::LocationKey;
use crate::models::{Game, MappingRule, NewRule, RuleId, RulePatch};
use crate::review::ReviewQueue;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize, Deserialize)]
pub struct UnvalidatedGameResponse {
    pub id: String,
    pub sport: String,
    pub date: String,
    pub matchup: String,
    pub national_channels: String,
    pub placeholder: String,
}

impl From<Game> for UnvalidatedGameResponse {
    fn from(g: Game) -> Self {
        Self {
            placeholder: ReviewQueue::placeholder(&g).to_string(),
            id: g.id,
            sport: g.sport,
            date: g.scheduled_time,
            matchup: g.matchup,
            national_channels: g.national_channels,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct UnvalidatedResponse {
    pub count: usize,
    pub games: Vec<UnvalidatedGameResponse>,
}

#[derive(Serialize, Deserialize)]
pub struct SaveRuleResponse {
    pub success: bool,
    pub message: String,
    pub id: RuleId,
    pub inserted: bool,
    pub rule: MappingRule,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorResponse { error: error.to_string() }))
}

fn rule_error(e: RuleError) -> ApiError {
    let status = match e {
        RuleError::NotFound(_) | RuleError::UnknownId(_) => StatusCode::NOT_FOUND,
        RuleError::MissingField(_) => StatusCode::BAD_REQUEST,
        RuleError::Conflict { .. } => StatusCode::CONFLICT,
    };
    api_error(status, e)
}

fn review_error(e: ReviewError) -> ApiError {
    let status = match e {
        ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
        ReviewError::AlreadyValidated(_) | ReviewError::MissingDefault(_) => StatusCode::CONFLICT,
        ReviewError::EmptyChannel => StatusCode::BAD_REQUEST,
    };
    api_error(status, e)
}

fn parse_rule_id(raw: &str) -> Result<RuleId, ApiError> {
    raw.parse()
        .map_err(|_| api_error(StatusCode::NOT_FOUND, format!("No mapping rule with id {}", raw)))
}

// ============================================================================
// Query Parameters / Bodies
// ============================================================================

#[derive(Deserialize)]
pub struct ZipQuery {
    pub zip: Option<String>,
}

impl ZipQuery {
    /// Absent or blank means "no location"; anything else must be a ZIP.
    fn location(&self) -> Result<Option<LocationKey>, LocationError> {
        match self.zip.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => LocationKey::parse_zip(raw).map(Some),
        }
    }
}

#[derive(Deserialize)]
pub struct ApproveRequest {
    pub channel: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<GuideService>;

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/stats
pub async fn get_stats(State(service): State<AppState>) -> Json<Stats> {
    Json(service.stats().await)
}

/// GET /api/schedule?zip=
pub async fn get_schedule(
    State(service): State<AppState>,
    Query(params): Query<ZipQuery>,
) -> Result<Json<ScheduleView>, ApiError> {
    let location = params
        .location()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    service
        .schedule(location.as_ref())
        .await
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

/// GET /api/games?zip=
pub async fn get_games(
    State(service): State<AppState>,
    Query(params): Query<ZipQuery>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let location = params
        .location()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    Ok(Json(service.games(location.as_ref()).await))
}

/// GET /api/admin/unvalidated
pub async fn get_unvalidated(State(service): State<AppState>) -> Json<UnvalidatedResponse> {
    let games: Vec<UnvalidatedGameResponse> = service
        .unvalidated_games()
        .await
        .into_iter()
        .map(UnvalidatedGameResponse::from)
        .collect();
    Json(UnvalidatedResponse {
        count: games.len(),
        games,
    })
}

/// POST /api/admin/unvalidated/:id/approve
pub async fn approve_game(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<Game>, ApiError> {
    service
        .approve_game(&id, &body.channel)
        .await
        .map(Json)
        .map_err(review_error)
}

/// GET /api/admin/dma-map
pub async fn list_rules(State(service): State<AppState>) -> Json<Vec<MappingRule>> {
    Json(service.list_rules().await)
}

/// POST /api/admin/dma-map
pub async fn create_rule(
    State(service): State<AppState>,
    Json(body): Json<NewRule>,
) -> Result<(StatusCode, Json<MappingRule>), ApiError> {
    service
        .create_rule(body)
        .await
        .map(|rule| (StatusCode::CREATED, Json(rule)))
        .map_err(rule_error)
}

/// POST /api/admin/map (upsert on DMA/team/sport)
pub async fn save_rule(
    State(service): State<AppState>,
    Json(body): Json<NewRule>,
) -> Result<Json<SaveRuleResponse>, ApiError> {
    match service.upsert_rule(body).await {
        Ok(result) => Ok(Json(SaveRuleResponse {
            success: true,
            message: "DMA Rule saved.".to_string(),
            id: result.rule.id,
            inserted: result.inserted,
            rule: result.rule,
        })),
        Err(e) => Err(rule_error(e)),
    }
}

/// GET /api/admin/dma-map/:id
pub async fn get_rule(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MappingRule>, ApiError> {
    let id = parse_rule_id(&id)?;
    service
        .get_rule(id)
        .await
        .map(Json)
        .ok_or_else(|| rule_error(RuleError::UnknownId(id)))
}

/// PUT /api/admin/dma-map/:id
pub async fn update_rule(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RulePatch>,
) -> Result<Json<MappingRule>, ApiError> {
    let id = parse_rule_id(&id)?;
    service.update_rule(id, patch).await.map(Json).map_err(rule_error)
}

/// DELETE /api/admin/dma-map/:id
pub async fn delete_rule(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_rule_id(&id)?;
    service
        .delete_rule(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(rule_error)
}

pub fn router(service: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(get_stats))
        // Viewer
        .route("/api/schedule", get(get_schedule))
        .route("/api/games", get(get_games))
        // Admin review queue
        .route("/api/admin/unvalidated", get(get_unvalidated))
        .route("/api/admin/unvalidated/:id/approve", post(approve_game))
        // DMA rules
        .route("/api/admin/map", post(save_rule))
        .route("/api/admin/dma-map", get(list_rules).post(create_rule))
        .route(
            "/api/admin/dma-map/:id",
            put(update_rule).get(get_rule).delete(delete_rule),
        )
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
