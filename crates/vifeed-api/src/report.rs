//! Report endpoints over the sentence view.
//!
//! Every request reads the full view from the store and runs one of the pure
//! report functions over it.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/report/filter` | Body: `DimensionFilter`; matching rows |
//! | `POST` | `/report/distribution` | Body: `DimensionFilter` |
//! | `GET`  | `/report/crosstab` | `?group_by=&semester=&course=&class=` |
//! | `GET`  | `/report/trend` | `?aspect=&course=&class=` |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use vifeed_core::{
  dimension::GroupBy,
  report::{
    self, CrossFilter, CrossTab, DimensionFilter, Distribution, Selector, Trend,
    TrendQuery,
  },
  sentence::SentenceRow,
  store::FeedbackStore,
};

use crate::{ApiState, error::ApiError};

async fn view<S: FeedbackStore>(store: &S) -> Result<Vec<SentenceRow>, ApiError> {
  store.sentence_view().await.map_err(ApiError::store)
}

// ─── Filter & distribution ────────────────────────────────────────────────────

/// `POST /report/filter`
pub async fn filter<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(filter): Json<DimensionFilter>,
) -> Result<Json<Vec<SentenceRow>>, ApiError>
where
  S: FeedbackStore,
{
  let rows = view(&*state.store).await?;
  let matching = report::filter_rows(&rows, &filter).into_iter().cloned().collect();
  Ok(Json(matching))
}

/// `POST /report/distribution`
pub async fn distribution<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(filter): Json<DimensionFilter>,
) -> Result<Json<Distribution>, ApiError>
where
  S: FeedbackStore,
{
  let rows = view(&*state.store).await?;
  let dist = report::distribution(report::filter_rows(&rows, &filter));
  Ok(Json(dist))
}

// ─── Cross-tab ────────────────────────────────────────────────────────────────

/// Absent or empty selectors mean "all".
#[derive(Debug, Deserialize, Default)]
pub struct CrossTabParams {
  pub group_by: Option<String>,
  pub semester: Option<String>,
  pub course:   Option<String>,
  pub class:    Option<String>,
}

/// `GET /report/crosstab`
pub async fn crosstab<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<CrossTabParams>,
) -> Result<Json<CrossTab>, ApiError>
where
  S: FeedbackStore,
{
  let group_by = match params.group_by.as_deref() {
    Some(g) => GroupBy::parse(g)?,
    None => GroupBy::default(),
  };
  let filter = CrossFilter {
    semester: Selector::from(params.semester),
    course:   Selector::from(params.course),
    class:    Selector::from(params.class),
  };

  let rows = view(&*state.store).await?;
  Ok(Json(report::cross_tab(&rows, &filter, group_by)))
}

// ─── Trend ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct TrendParams {
  pub aspect: Option<String>,
  pub course: Option<String>,
  pub class:  Option<String>,
}

/// `GET /report/trend?aspect=<name>[&course=<code>][&class=<name>]`
pub async fn trend<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<TrendParams>,
) -> Result<Json<Trend>, ApiError>
where
  S: FeedbackStore,
{
  let aspect = params
    .aspect
    .filter(|a| !a.is_empty())
    .ok_or_else(|| ApiError::BadRequest("aspect is required".into()))?;
  let query = TrendQuery {
    aspect,
    course: Selector::from(params.course),
    class: Selector::from(params.class),
  };

  let rows = view(&*state.store).await?;
  Ok(Json(report::trend(&rows, &query)))
}
