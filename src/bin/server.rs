use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daily_scoreboard::{
    error::ScoreboardError, GameType, LeaderboardEntry, LeaderboardQuery, ParsedScore, Score,
    ScoreEngine, ServerConfig,
};

#[derive(Clone)]
struct AppState {
    engine: Arc<ScoreEngine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParseRequest {
    raw_paste: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    user_id: String,
    raw_paste: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardParams {
    game_type: String,
    game_date: Option<String>,
    current_user: Option<String>,
    /// Comma-separated user ids
    members: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_scores: u64,
    distinct_users: u64,
    by_game: BTreeMap<GameType, u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scoreboard_server=debug,daily_scoreboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    tracing::info!("Starting Daily Scoreboard Server");
    tracing::info!("Database: {}", config.db_path);
    tracing::info!("Port: {}", config.port);

    let engine = ScoreEngine::new(&config.db_path).await?;

    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/parse", post(parse_handler))
        .route("/v1/scores", post(submit_handler))
        .route("/v1/leaderboard", get(leaderboard_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: daily_scoreboard::VERSION.to_string(),
    })
}

async fn parse_handler(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParsedScore>, AppError> {
    let parsed = state.engine.parse(&req.raw_paste)?;
    tracing::debug!("Parsed {} paste: {}", parsed.game_type, parsed.score_data.display_score);
    Ok(Json(parsed))
}

async fn submit_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<Score>, AppError> {
    let score = state.engine.submit(&req.user_id, &req.raw_paste).await?;
    Ok(Json(score))
}

async fn leaderboard_handler(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let game_type: GameType = params.game_type.parse()?;

    let game_date = params
        .game_date
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ScoreboardError::InvalidInput(format!("gameDate must be YYYY-MM-DD: {}", raw)))
        })
        .transpose()?;

    let members = parse_members(params.members);

    let query = LeaderboardQuery {
        game_type,
        game_date,
        members,
        current_user: params.current_user,
    };

    Ok(Json(state.engine.leaderboard(&query).await?))
}

/// Comma-separated user ids; an empty list means the global board
fn parse_members(raw: Option<String>) -> Option<Vec<String>> {
    let members: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    if members.is_empty() {
        None
    } else {
        Some(members)
    }
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.engine.stats().await?;

    Ok(Json(StatsResponse {
        total_scores: stats.total_scores,
        distinct_users: stats.distinct_users,
        by_game: stats.by_game,
    }))
}

// Error handling
struct AppError(ScoreboardError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            ScoreboardError::UnrecognizedFormat => (
                StatusCode::BAD_REQUEST,
                "Score format not recognized. Check the pasted text and try again.".to_string(),
            ),
            ScoreboardError::DuplicateSubmission { .. } => {
                (StatusCode::CONFLICT, "first attempts only!".to_string())
            }
            e @ (ScoreboardError::InvalidInput(_) | ScoreboardError::UnknownGame(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("Error: {} - {}", status, message);
        } else {
            tracing::debug!("Rejected request: {} - {}", status, message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<ScoreboardError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
