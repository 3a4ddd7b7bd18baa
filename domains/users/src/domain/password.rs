/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use postboard_common::{Error, Result};

/// Hash a password with Argon2id and a random per-password salt.
///
/// Returns a PHC-formatted string safe for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash or a hasher failure is
/// an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
