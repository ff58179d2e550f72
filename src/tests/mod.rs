//! Integration and unit tests for the Heroes API.
//!
//! ## Test Modules
//!
//! - **api_tests**: character endpoints through the full router
//! - **uploads_api_tests**: image upload, retrieval and deletion
//! - **store_tests**: both `CharacterStore` backends against the same scenarios
//! - **service_tests**: validation and not-found handling
//! - **error_tests**: error rendering and validation helpers
//! - **config_tests**: configuration defaults, loading and validation
//! - **health_api_tests**: health, readiness, metrics and version endpoints
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test api_tests
//! ```

pub mod support;

pub mod api_tests;
pub mod service_tests;
