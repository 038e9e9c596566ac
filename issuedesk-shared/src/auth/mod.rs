/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Signed session tokens carrying the logged-in username
///
/// # Example
///
/// ```
/// use issuedesk_shared::auth::password::{hash_password, verify_password};
/// use issuedesk_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("hunter2")?;
/// assert!(verify_password("hunter2", &hash)?);
///
/// let secret = "an-example-secret-that-is-32-bytes!";
/// let token = create_session_token(&SessionClaims::new("alice"), secret)?;
/// assert_eq!(validate_session_token(&token, secret)?.sub, "alice");
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
