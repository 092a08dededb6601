use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// The algorithm name accepted by [`HashScheme::from_name`].
pub const DEFAULT_HASH_ALGORITHM: &str = "SHA-256";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Password-hashing scheme, resolved by name at configuration time.
/// An unknown name is a fatal configuration error, never a login failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashScheme {
    #[default]
    Sha256,
}

impl HashScheme {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            DEFAULT_HASH_ALGORITHM => Ok(Self::Sha256),
            other => Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        DEFAULT_HASH_ALGORITHM
    }

    /// Unsalted hex digest of the plaintext. Weak by design: the record
    /// format stores exactly this digest and login recomputes it per attempt.
    pub fn digest(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn hash(&self, password: &str) -> PasswordHash {
        PasswordHash::from_digest(self.digest(password))
    }

    /// Byte-for-byte comparison of a fresh digest against the stored one.
    pub fn verify(&self, password: &str, stored: &PasswordHash) -> bool {
        stored.expose() == self.digest(password)
    }
}

/// Stored password digest with secrecy protection (redacted in Debug).
/// Plaintext never survives construction.
#[derive(Clone)]
pub struct PasswordHash(SecretString);

impl PasswordHash {
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(SecretString::from(digest.into()))
    }

    /// Exposes the hex digest. Callers are the record codec (serialization)
    /// and the verify path; nothing else should touch this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}
