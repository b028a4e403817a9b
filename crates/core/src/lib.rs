//! `smartfood-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory
//! model, the HTTP client and the assistant (no IO, no HTTP).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::ItemId;
