//! HTTP server for player lookups and hitter similarity

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::SimilarityEngine;
use crate::error::{ServiceError, SimilarityError};
use crate::types::{PlayerSummary, SeasonLine, SimilarRequest, SimilarResponse};

const DEFAULT_K: usize = 10;
const DEFAULT_MIN_AB: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub k: Option<usize>,
    pub min_ab: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<PlayerSummary>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    pub store: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request".to_string(), Some(msg.clone())),
            ServiceError::Similarity(SimilarityError::MissingField(_)) => {
                (StatusCode::BAD_REQUEST, "Bad input".to_string(), Some(self.to_string()))
            }
            ServiceError::Similarity(SimilarityError::DimensionMismatch { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Similarity failed".to_string(), Some(self.to_string()))
            }
            ServiceError::Store(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Store query failed".to_string(), Some(e.to_string()))
            }
        };

        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

/// Health check handler
async fn health_handler(State(engine): State<Arc<SimilarityEngine>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "lahmangraph".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: engine.store_name().to_string(),
    })
}

async fn search_handler(
    State(engine): State<Arc<SimilarityEngine>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ServiceError> {
    let Query(params) = params?;
    info!("Player search: q='{}'", params.q);
    let results = engine.search_players(&params.q).await?;
    Ok(Json(SearchResponse { results }))
}

async fn season_handler(
    State(engine): State<Arc<SimilarityEngine>>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<SeasonLine>, ServiceError> {
    let Path((player_id, year)) = path?;
    Ok(Json(engine.player_season(&player_id, year).await?))
}

async fn similar_handler(
    State(engine): State<Arc<SimilarityEngine>>,
    path: Result<Path<(String, i64)>, PathRejection>,
    query: Result<Query<SimilarQuery>, QueryRejection>,
) -> Result<Json<SimilarResponse>, ServiceError> {
    let Path((player_id, year)) = path?;
    let Query(query) = query?;
    let req = SimilarRequest {
        player_id,
        year,
        k: query.k.unwrap_or(DEFAULT_K),
        min_ab: query.min_ab.unwrap_or(DEFAULT_MIN_AB),
    };
    Ok(Json(engine.similar_hitters(req).await?))
}

/// Create and configure the HTTP router
pub fn create_router(engine: Arc<SimilarityEngine>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/player/search", get(search_handler))
        .route("/player/:player_id/season/:year", get(season_handler))
        .route("/player/:player_id/season/:year/similar", get(similar_handler))
        .with_state(engine)
}

/// Serve on an already bound listener
pub async fn serve(listener: tokio::net::TcpListener, engine: Arc<SimilarityEngine>) -> anyhow::Result<()> {
    let app = create_router(engine);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the HTTP server
pub async fn run_server(engine: Arc<SimilarityEngine>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting lahmangraph server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    serve(listener, engine).await
}
