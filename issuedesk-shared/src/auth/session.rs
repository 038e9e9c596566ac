/// Signed session tokens
///
/// After a successful login the server hands the browser a token that names
/// the logged-in user. The token is an HS256 JWT, so the server keeps no
/// session table: any request presenting a token with a valid signature,
/// issuer and expiry is treated as coming from `sub`.
///
/// # Claims
///
/// - `sub`: username (the session identity)
/// - `iss`: always `"issuedesk"`
/// - `iat` / `nbf`: issue time
/// - `exp`: expiry, `DEFAULT_SESSION_TTL_HOURS` after issue unless overridden
///
/// # Example
///
/// ```
/// use issuedesk_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = create_session_token(&SessionClaims::new("alice"), secret)?;
///
/// let claims = validate_session_token(&token, secret)?;
/// assert_eq!(claims.username(), "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every session token
pub const SESSION_ISSUER: &str = "issuedesk";

/// Lifetime of a session token when none is configured (7 days)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Signature, issuer or format check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),

    /// Token is past its `exp`
    #[error("Session token has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the logged-in username
    pub sub: String,

    /// Issuer - always "issuedesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl SessionClaims {
    /// Creates claims for `username` with the default lifetime
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_expiration(username, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    /// Creates claims for `username` expiring `expires_in` from now
    ///
    /// A negative duration yields already-expired claims, which is useful in tests.
    pub fn with_expiration(username: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: username.into(),
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// The session identity
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs `claims` into a compact JWT using HS256
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and returns its claims
///
/// Checks the signature, the issuer, `exp` and `nbf`.
///
/// # Errors
///
/// - `SessionError::Expired` if the token is past its expiry
/// - `SessionError::Invalid` for a bad signature, issuer or format
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = SessionClaims::new("alice");

        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.iss, SESSION_ISSUER);
        assert_eq!(claims.exp - claims.iat, DEFAULT_SESSION_TTL_HOURS * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let token = create_session_token(&SessionClaims::new("alice"), SECRET).unwrap();

        let validated = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(validated.username(), "alice");
        assert_eq!(validated.iss, SESSION_ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_session_token(&SessionClaims::new("alice"), SECRET).unwrap();

        let result = validate_session_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Well past the validator's default leeway
        let claims = SessionClaims::with_expiration("alice", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_session_token(&claims, SECRET).unwrap();
        let result = validate_session_token(&token, SECRET);

        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_validate_foreign_issuer() {
        let mut claims = SessionClaims::new("alice");
        claims.iss = "someone-else".to_string();
        let token = create_session_token(&claims, SECRET).unwrap();

        assert!(validate_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_validate_garbage() {
        assert!(validate_session_token("", SECRET).is_err());
        assert!(validate_session_token("not.a.token", SECRET).is_err());
    }

    #[test]
    fn test_tampered_subject_is_rejected() {
        let token = create_session_token(&SessionClaims::new("alice"), SECRET).unwrap();
        let forged = create_session_token(&SessionClaims::new("mallory"), "attacker-key-that-is-32-bytes-long!").unwrap();

        // Splice mallory's payload onto alice's signature
        let alice: Vec<&str> = token.split('.').collect();
        let mallory: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", alice[0], mallory[1], alice[2]);

        assert!(validate_session_token(&spliced, SECRET).is_err());
    }
}
