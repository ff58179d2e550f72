//! HTTP middleware layered around the router.
//!
//! - `security_headers`: security and caching response headers
//! - `validation`: early rejection of traversal attempts and oversized bodies

pub mod security_headers;
pub mod validation;
