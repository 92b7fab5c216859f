//! Core types and trait definitions for vifeed, a review backend for
//! aspect-based sentiment predictions on student-feedback sentences.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::FeedbackStore`]; prediction backends
//! implement [`predict::Predictor`]. The reporting pipeline in [`report`] is a
//! set of pure functions over the denormalized sentence view.

pub mod batch;
pub mod catalog;
pub mod dimension;
pub mod error;
pub mod predict;
pub mod report;
pub mod roster;
pub mod sentence;
pub mod session;
pub mod store;

pub use error::{Error, Result};
