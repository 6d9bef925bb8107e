//! Fetch-or-404 helper for optional lookups.
//!
//! Repositories return `Option` for single-row lookups; services that require
//! the row convert absence into [`Error::not_found`] via [`FetchOrNotFound`].

use super::Error;

/// Extension turning `Result<Option<T>, Error>` into `Result<T, Error>`.
///
/// # Examples
/// ```
/// use templatehub::domain::{Error, ErrorCode, FetchOrNotFound};
///
/// let missing: Result<Option<u8>, Error> = Ok(None);
/// let err = missing.or_not_found(|| "template 7 not found").unwrap_err();
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
pub trait FetchOrNotFound<T> {
    /// Require the value, failing with `NotFound` built from `message`.
    fn or_not_found<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T> FetchOrNotFound<T> for Result<Option<T>, Error> {
    fn or_not_found<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self?.ok_or_else(|| Error::not_found(message()))
    }
}

impl<T> FetchOrNotFound<T> for Option<T> {
    fn or_not_found<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.ok_or_else(|| Error::not_found(message()))
    }
}
