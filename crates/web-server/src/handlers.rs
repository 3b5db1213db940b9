use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use core_types::{DailySpread, PeriodUnit, SpreadResult, StatsResult};
use serde::Deserialize;
use service::DynQueryService;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodParams {
    pub period: i64,
    pub period_type: PeriodUnit,
}

#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: String,
}

/// Runs a query on the blocking pool; stores read files synchronously.
async fn run_query<T, F>(state: Arc<AppState>, query: F) -> Result<T, AppError>
where
    F: FnOnce(&DynQueryService) -> T + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || query(&state.service)).await?;
    Ok(result)
}

/// # GET /cryptos/normalized-range
/// All symbols ranked by normalized range, widest first.
pub async fn get_ranked_spread(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SpreadResult>>, AppError> {
    let ranked = run_query(state, |service| service.ranked_spread()).await?;
    Ok(Json(ranked))
}

/// # GET /cryptos/:symbol/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<StatsResult>, AppError> {
    let stats = run_query(state, move |service| service.stats(&symbol)).await??;
    Ok(Json(stats))
}

/// # GET /cryptos/:symbol/stats/period?period=30&periodType=DAYS
pub async fn get_stats_for_period(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<StatsResult>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let stats = run_query(state, move |service| {
        service.stats_for_period(&symbol, params.period, params.period_type)
    })
    .await??;
    Ok(Json(stats))
}

/// # GET /cryptos/highest-normalized-range?date=2022-01-13
/// Responds with `null` when no symbol has data on that day.
pub async fn get_best_for_date(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DateParams>, QueryRejection>,
) -> Result<Json<Option<DailySpread>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let best = run_query(state, move |service| service.best_for_date(&params.date)).await??;
    Ok(Json(best))
}
