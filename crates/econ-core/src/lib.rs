//! Core data model for econ-rs
//!
//! This crate defines the fundamental types shared across the econ-rs
//! workspace: observation series, sampling frequencies, series metadata,
//! and the error types that describe malformed series data.

pub mod error;
pub mod frequency;
pub mod logging;
pub mod series;

pub use error::{Result, SeriesError};
pub use frequency::Frequency;
pub use logging::init_tracing;
pub use series::{Observation, ObservationSeries, SeriesMetadata};
