// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using scrypt with a fresh salt.
///
/// Two calls with the same input produce different digests.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored digest.
///
/// A mismatch is `Ok(false)`; only a malformed digest is an error.
pub fn verify_password(hash: &str, plain: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("corrupt password digest: {e}"))?;
    Ok(Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok())
}
