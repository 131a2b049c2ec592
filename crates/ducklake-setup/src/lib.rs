//! DuckLake Setup
//!
//! Shared configuration and engine bootstrap for wiring a business
//! intelligence deployment to a DuckLake lakehouse catalog.
//!
//! This crate provides:
//! - Environment-backed configuration model: storage drivers, catalog
//!   metadata store, warehouse federation, cache backend
//! - DuckDB engine operations: extension install, secret registration,
//!   catalog attachment
//! - Setup orchestration for one-shot initialization and per-connection
//!   configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod setup;

pub use config::Settings;
pub use error::{ConfigError, SetupError};
pub use setup::{ConnectionState, SetupReport};

pub use duckdb::Connection;
