//! Reference-data reads: dimension option lists and table counts.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use vifeed_core::{
  report::DimensionOptions,
  store::{FeedbackStore, TableCounts},
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct OptionsParams {
  /// Cap semester and class lists at the sidebar length.
  #[serde(default)]
  pub sidebar: bool,
}

/// `GET /dimensions[?sidebar=true]`
pub async fn options<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<OptionsParams>,
) -> Result<Json<DimensionOptions>, ApiError>
where
  S: FeedbackStore,
{
  let options = state
    .store
    .dimension_options()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(if params.sidebar { options.sidebar() } else { options }))
}

/// `GET /stats/tables`
pub async fn table_counts<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<TableCounts>, ApiError>
where
  S: FeedbackStore,
{
  let counts = state.store.table_counts().await.map_err(ApiError::store)?;
  Ok(Json(counts))
}
