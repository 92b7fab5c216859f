//! `GET`/`PUT /settings`: the session's selected model and display settings.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use vifeed_core::{
  predict::PredictionModel,
  session::{DisplaySettings, Session},
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsView {
  pub model:    PredictionModel,
  pub settings: DisplaySettings,
}

impl From<&Session> for SettingsView {
  fn from(s: &Session) -> Self {
    Self { model: s.model, settings: s.settings.clone() }
  }
}

/// Fields left out are unchanged.
#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
  pub model:    Option<PredictionModel>,
  pub settings: Option<DisplaySettings>,
}

/// `GET /settings`
pub async fn get<S, P>(State(state): State<ApiState<S, P>>) -> Json<SettingsView> {
  Json(SettingsView::from(&*state.session.read().await))
}

/// `PUT /settings`. Invalid colours or fonts are rejected and nothing changes.
pub async fn put<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(body): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, ApiError> {
  let mut session = state.session.write().await;
  if let Some(settings) = body.settings {
    session.update_settings(settings)?;
  }
  if let Some(model) = body.model {
    session.model = model;
  }
  tracing::debug!(model = %session.model, font = %session.settings.font, "settings updated");
  Ok(Json(SettingsView::from(&*session)))
}
