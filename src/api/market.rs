use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::response::Envelope;
use crate::service::{MarketService, Ranked};

pub fn status_for(err: &AppError) -> StatusCode {
    if err.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn failure(operation: &str, err: AppError) -> Response {
    warn!("{} failed: {}", operation, err);
    (status_for(&err), Json(Envelope::<()>::failure(&err))).into_response()
}

fn respond<T: Serialize>(operation: &str, result: Result<T>) -> Response {
    match result {
        Ok(data) => Json(Envelope::success(data)).into_response(),
        Err(err) => failure(operation, err),
    }
}

fn respond_ranked<T: Serialize>(operation: &str, result: Result<Ranked<T>>) -> Response {
    match result {
        Ok(ranked) => Json(Envelope::ranked(ranked.rows, ranked.failed_count)).into_response(),
        Err(err) => failure(operation, err),
    }
}

async fn home() -> Json<Envelope<()>> {
    Json(Envelope::notice("TradeSight Backend API is running"))
}

async fn top_gainers(State(service): State<Arc<MarketService>>) -> Response {
    respond_ranked("top_gainers", service.top_gainers().await)
}

async fn top_losers(State(service): State<Arc<MarketService>>) -> Response {
    respond_ranked("top_losers", service.top_losers().await)
}

async fn top_volume(State(service): State<Arc<MarketService>>) -> Response {
    respond_ranked("top_volume", service.top_volume().await)
}

#[derive(Debug, Deserialize)]
struct SuggestionParams {
    data: Option<String>,
}

async fn suggestions(
    State(service): State<Arc<MarketService>>,
    Query(params): Query<SuggestionParams>,
) -> Response {
    respond("suggestions", service.search(params.data.as_deref()).await)
}

async fn indices_data(State(service): State<Arc<MarketService>>) -> Response {
    respond("indices_data", Ok(service.index_snapshot().await))
}

#[derive(Debug, Deserialize)]
struct StocksParams {
    model: Option<String>,
}

async fn fetch_stocks(
    State(service): State<Arc<MarketService>>,
    Query(params): Query<StocksParams>,
) -> Response {
    respond("fetch_stocks", service.list_stocks(params.model.as_deref()).await)
}

pub fn router() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/", get(home))
        .route("/api/top_gainers", get(top_gainers))
        .route("/api/top_losers", get(top_losers))
        .route("/api/top_volume", get(top_volume))
        .route("/api/suggestions", get(suggestions))
        .route("/api/indices-data", get(indices_data))
        .route("/api/fetch_stocks", get(fetch_stocks))
}
