//! Handlers for `/sentences` and `/students`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sentences` | Denormalized view, insertion order |
//! | `POST` | `/sentences` | Body: `NewSentence`; blank text rejected, unknown labels stored as null |
//! | `GET`  | `/students` | Optional `?class=K47A` |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use vifeed_core::{
  catalog::Student,
  sentence::{NewSentence, SentenceRow},
  store::FeedbackStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /sentences`
pub async fn list<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<Vec<SentenceRow>>, ApiError>
where
  S: FeedbackStore,
{
  let rows = state.store.sentence_view().await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `POST /sentences`
pub async fn create<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(body): Json<NewSentence>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedbackStore,
{
  if body.text.trim().is_empty() {
    return Err(ApiError::BadRequest("text must not be empty".into()));
  }
  let sentence = state
    .store
    .insert_sentence(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(sentence)))
}

#[derive(Debug, Deserialize)]
pub struct StudentParams {
  pub class: Option<String>,
}

/// `GET /students[?class=<name>]`
pub async fn students<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<StudentParams>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: FeedbackStore,
{
  let students = state
    .store
    .list_students(params.class)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(students))
}
