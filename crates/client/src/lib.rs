//! `smartfood-client`
//!
//! **Responsibility:** the HTTP capability the assistant depends on.
//!
//! This crate provides:
//! - [`PantryApi`]: the six calls the assistant makes against the
//!   prediction/storage service
//! - [`HttpPantryApi`]: the reqwest implementation (timeouts, optional bearer token)
//! - [`InMemoryPantry`]: an in-process backend for tests and demos
//! - [`ClientConfig`]: injected base address and timeout
//!
//! The client never caches: every call is a round-trip.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod in_memory;
pub mod wire;

pub use api::{PantryApi, SavedItem};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult, FailureKind};
pub use http::HttpPantryApi;
pub use in_memory::{InMemoryPantry, RecordedCall};
