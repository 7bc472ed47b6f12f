use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::server::error::Error;

/// Random URL-safe token, used for invitations and OAuth credentials
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex encoded SHA-256 of a token, the only form tokens are stored in
pub fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Hashes a password with argon2 and a random salt, on the blocking pool
pub async fn hash_password(password: String) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| Error::InternalError(format!("Password hashing task failed: {}", e)))?
}

/// Checks a password against a stored argon2 digest, on the blocking pool
///
/// A malformed digest never matches.
pub async fn verify_password(password: String, password_digest: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || verify(&password, &password_digest))
        .await
        .map_err(|e| Error::InternalError(format!("Password verification task failed: {}", e)))
}

fn hash(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::InternalError(format!("Failed to hash password: {}", e)))
}

fn verify(password: &str, password_digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_digest) else {
        tracing::warn!("Stored password digest could not be parsed");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect a hashed password to verify only with the same password
    #[tokio::test]
    async fn verifies_hashed_password() -> Result<(), Error> {
        let hashed = hash_password("correct horse battery".to_string()).await?;

        assert!(verify_password("correct horse battery".to_string(), hashed.clone()).await?);
        assert!(!verify_password("wrong horse battery".to_string(), hashed).await?);
        assert!(
            !verify_password("correct horse battery".to_string(), "not a digest".to_string())
                .await?
        );

        Ok(())
    }

    /// Expect tokens to be unique and their digest to be stable
    #[test]
    fn generates_distinct_tokens() {
        let first = generate_token();
        let second = generate_token();

        assert_ne!(first, second);
        assert_eq!(digest(&first), digest(&first));
        assert_eq!(digest(&first).len(), 64);
    }
}
