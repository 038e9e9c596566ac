/// Password hashing using Argon2id
///
/// Account passwords are never stored or compared in plain text. Signup
/// stores a salted PHC string and login verifies against it; the verifier
/// compares digests in constant time.
///
/// # Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 19 MiB (19456 KiB)
/// - **Iterations**: 2
/// - **Parallelism**: 1 lane
/// - **Salt**: 16 random bytes from the OS RNG
///
/// These are the OWASP minimum recommendations for Argon2id. Verification
/// reads the parameters back out of the stored hash, so they can be raised
/// later without invalidating existing accounts.
///
/// # Example
///
/// ```
/// use issuedesk_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("s3cret")?;
/// assert!(verify_password("s3cret", &hash)?);
/// assert!(!verify_password("guess", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};

/// Memory cost in KiB
const MEMORY_COST_KIB: u32 = 19_456;

/// Number of passes over memory
const TIME_COST: u32 = 2;

/// Degree of parallelism
const PARALLELISM: u32 = 1;

/// Password hashing failures
///
/// A wrong password is not an error; see [`verify_password`].
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Argon2 could not produce a hash
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored credential is not a PHC string
    #[error("stored credential is not an argon2 hash: {0}")]
    MalformedHash(String),

    /// Argon2 failed for a reason other than a mismatch
    #[error("password verification failed: {0}")]
    Verify(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .build()
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// Returns the PHC string, e.g.
/// ```text
/// $argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>
/// ```
///
/// Empty passwords are hashed like any other; the signup form does not
/// validate input.
///
/// # Errors
///
/// Returns `PasswordError::Hash` if Argon2 rejects the input
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password. An unparseable hash is an
/// error rather than a mismatch so that corrupted rows are noticed.
///
/// # Errors
///
/// - `PasswordError::MalformedHash` if `stored` is not a PHC string
/// - `PasswordError::Verify` for any other verifier failure
pub fn verify_password(candidate: &str, stored: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(stored).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    // Parameters come from the stored hash, not from `hasher()`
    match Argon2::default().verify_password(candidate.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}
