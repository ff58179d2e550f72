//! # Heroes API
//!
//! REST backend for a catalogue of comic-book characters, with image uploads
//! stored on the local filesystem.
//!
//! ## Architecture
//!
//! - **Axum** for routing and extraction
//! - **SQLx** over SQLite for the `characters` table
//! - **Tokio** as the async runtime
//! - **Serde** for the JSON API
//!
//! ## Core Components
//!
//! - [`config`]: layered configuration (embedded defaults, file, environment)
//! - [`db`]: pool setup and schema initialization
//! - [`store`]: the `CharacterStore` trait with SQLite and in-memory backends
//! - [`service`]: validation and not-found handling on top of the store
//! - [`assets`]: image files on disk
//! - [`seed`]: sample roster for an empty store
//! - [`routes`]: HTTP handlers and router assembly
//! - [`middleware`]: security headers and request validation
//! - [`error`]: `AppError` and its JSON rendering
//! - [`metrics`]: counters exposed at `/metrics`
//! - [`state`]: shared application state
//! - [`types`]: records, payloads and filters

pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
