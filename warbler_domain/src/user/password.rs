use crate::error::{WbError, WbResult};

use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use entrait::entrait;

/// Warning: This should not implement Debug in production
#[derive(Clone, Eq, PartialEq, serde::Deserialize)]
#[serde(transparent)]
pub struct CleartextPassword(pub String);

impl<S: Into<String>> From<S> for CleartextPassword {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for CleartextPassword {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A PHC-formatted argon2 hash as stored in the user table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PasswordHash(pub String);

impl<S: Into<String>> From<S> for PasswordHash {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[entrait(pub HashPassword, no_deps)]
async fn hash_password(password: CleartextPassword) -> WbResult<PasswordHash> {
    // Argon2 hashing is designed to be computationally intensive,
    // so we need to do this on a blocking thread.
    tokio::task::spawn_blocking(move || -> WbResult<PasswordHash> {
        let salt = SaltString::generate(rand::thread_rng());
        // Fully qualified, since the blanket `HashPassword` impl also has a `hash_password`.
        let hash = PasswordHasher::hash_password(&Argon2::default(), password.0.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("failed to generate password hash: {}", e))?;
        Ok(hash.to_string().into())
    })
    .await
    .context("panic when generating password hash")?
}

#[entrait(pub VerifyPassword, no_deps)]
async fn verify_password(password: CleartextPassword, password_hash: PasswordHash) -> WbResult<()> {
    tokio::task::spawn_blocking(move || -> WbResult<()> {
        use argon2::password_hash::PasswordHash;
        let hash = PasswordHash::new(&password_hash.0)
            .map_err(|e| anyhow::anyhow!("invalid password hash: {}", e))?;

        hash.verify_password(&[&Argon2::default()], password.0)
            .map_err(|e| match e {
                argon2::password_hash::Error::Password => WbError::Unauthorized,
                _ => anyhow::anyhow!("failed to verify password hash: {}", e).into(),
            })
    })
    .await
    .context("panic when verifying password hash")??;

    Ok(())
}
