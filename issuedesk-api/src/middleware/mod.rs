/// Middleware modules for the web server
///
/// - `session`: Session gate for protected routes
/// - `security`: Security response headers

pub mod security;
pub mod session;
