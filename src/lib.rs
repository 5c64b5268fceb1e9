//! Postseason Oracle: scrapes team statistics, builds the historical
//! training dataset, and turns inference-endpoint output into seeded playoff
//! predictions.

pub mod common;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod endpoint;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod predict;
pub mod sources;

pub use common::error::{OracleError, Result};
