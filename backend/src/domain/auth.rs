//! Authentication primitives: passwords, stored digests and login credentials.
//!
//! Raw passwords live in [`Zeroizing`] buffers and are only ever compared via
//! [`PasswordDigest::verify`]. Digests are persisted as Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so the cost parameters
//! travel with each stored hash.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2};
use rand::RngCore;
use zeroize::Zeroizing;

use super::{Email, MemberValidationError};

const SALT_LEN: usize = 16;

/// Plain-text password supplied by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a non-empty password. Whitespace is preserved.
    pub fn new(value: &str) -> Result<Self, MemberValidationError> {
        if value.is_empty() {
            return Err(MemberValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Borrow the raw password.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Error raised when a stored digest cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored password digest is malformed")]
pub struct MalformedDigest;

/// Error raised when a password cannot be hashed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashingFailed(String);

/// Argon2id password digest in PHC string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with Argon2id under a fresh random salt.
    pub fn derive(password: &Password) -> Result<Self, HashingFailed> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|err| HashingFailed(err.to_string()))?;
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| HashingFailed(err.to_string()))
    }

    /// Parse a persisted PHC string. Only Argon2id hashes are accepted.
    pub fn parse(encoded: &str) -> Result<Self, MalformedDigest> {
        let hash = PasswordHash::new(encoded).map_err(|_| MalformedDigest)?;
        if hash.algorithm != Algorithm::Argon2id.ident() || hash.hash.is_none() {
            return Err(MalformedDigest);
        }
        Ok(Self(encoded.to_owned()))
    }

    /// Encode for storage.
    #[must_use]
    pub fn encode(&self) -> String {
        self.0.clone()
    }

    /// Check whether `password` produces this digest.
    ///
    /// The cost parameters and salt are read back from the stored string.
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.expose().as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// Validated login credentials used by authentication services.
///
/// # Examples
/// ```
/// use templatehub::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, MemberValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Email used for the member lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}
