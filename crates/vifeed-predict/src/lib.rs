//! HTTP client for the external aspect/sentiment prediction service.
//!
//! The service exposes one `POST` endpoint per model. Requests carry
//! `{"text": ...}`; responses carry `{"predictions": [{"aspect",
//! "sentiment"}, ...]}`.

mod client;

pub use client::{DEFAULT_BASE_URL, PredictConfig, PredictionClient};
