use crate::command::{execute_raw, CommandHandler, ErrorCode};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dex_protocol::{QueryParams, TypesResponse};
use dex_search::SearchEngine;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub(crate) struct HttpState {
    pub engine: SearchEngine,
    pub commands: CommandHandler,
    pub catalog_records: usize,
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/pokemon/search", get(search))
        .route("/api/pokemon/types", get(types))
        .route("/command", post(command))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

async fn index() -> Response {
    Json(json!({
        "message": "Dex search API running",
        "endpoints": {
            "search": "GET /api/pokemon/search",
            "types": "GET /api/pokemon/types",
            "command": "POST /command",
            "health": "GET /health",
            "parameters": {
                "query": "Search term (name, type, etc.)",
                "type": "Filter by type (e.g., fire, water)",
                "minAttack": "Minimum attack stat",
                "maxAttack": "Maximum attack stat",
                "minDefense": "Minimum defense stat",
                "maxDefense": "Maximum defense stat",
                "minHp": "Minimum HP stat",
                "maxHp": "Maximum HP stat",
                "minSpeed": "Minimum speed stat",
                "maxSpeed": "Maximum speed stat",
                "limit": "Number of results (default: 20)",
                "searchMode": "Search mode: 'fulltext', 'semantic', or 'hybrid' (default: 'hybrid')"
            }
        }
    }))
    .into_response()
}

async fn health(State(state): State<Arc<HttpState>>) -> Response {
    Json(json!({ "status": "ok", "catalog_records": state.catalog_records })).into_response()
}

async fn search(
    State(state): State<Arc<HttpState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let query = match params.into_query() {
        Ok(query) => query,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, format!("{err:#}")),
    };

    match state.engine.search(&query).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            log::error!("Search failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn types(State(state): State<Arc<HttpState>>) -> Response {
    match state.engine.types().await {
        Ok(types) => Json(TypesResponse { types }).into_response(),
        Err(err) => {
            log::error!("Types lookup failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

async fn command(State(state): State<Arc<HttpState>>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body);
    let response = execute_raw(&state.commands, &raw).await;

    let rejected = response
        .error
        .as_ref()
        .is_some_and(|error| error.code == ErrorCode::InvalidRequest.as_str());
    let status = if rejected {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
