//! Flight fare predictor HTTP service
//!
//! A thin axum layer over a [`fare_core::TrainedModel`] that is loaded or
//! trained once at startup and shared read-only between requests.

pub mod api;
pub mod audit;
pub mod config;
pub mod schemas;

pub use api::{build_router, ApiError, AppState};
pub use audit::{AuditEntry, AuditSink, CsvAuditLog, NoopAuditLog};
pub use config::{ConfigError, ServiceConfig};
