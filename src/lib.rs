//! Commission and squad aggregation engine for a multi-level sales network.
//!
//! The crate is a pure computation layer. A data-access layer supplies member,
//! lead and commission records through the [`repository::NetworkRepository`]
//! seam; dashboards consume the derived monthly batches, payment forecasts and
//! squad metrics. No transport, persistence or rendering lives here.

pub mod config;
pub mod error;
pub mod repository;
pub mod schemas;
pub mod services;

pub use config::EnginePolicy;
pub use error::{EngineError, EngineResult};
