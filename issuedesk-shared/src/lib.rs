//! # IssueDesk Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the IssueDesk web server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing and signed session tokens
//! - `db`: Connection pool and schema bootstrap
//! - `models`: Database models (users, issues, login attempts, knowledge articles)

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the IssueDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
