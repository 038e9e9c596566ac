/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout
/// - `issues`: Issue list, reporting, closing, restart no-op
/// - `knowledge`: Knowledge articles attached to issues

pub mod auth;
pub mod health;
pub mod issues;
pub mod knowledge;
