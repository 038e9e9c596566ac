//! # IssueDesk Web Server Library
//!
//! Server-rendered issue tracker: accounts, issue reporting and closing,
//! and knowledge articles describing how issues were resolved.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `flash`: One-shot messages carried across redirects
//! - `middleware`: Session gate and security headers
//! - `routes`: Route handlers
//! - `templates`: HTML pages

pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod routes;
pub mod templates;
