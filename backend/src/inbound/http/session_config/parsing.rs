//! Flag and `SameSite` parsing for session configuration.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const FLAG_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean environment variable and its debug-build default.
pub(super) struct FlagVar {
    name: &'static str,
    fallback: bool,
}

impl FlagVar {
    pub(super) const fn new(name: &'static str, fallback: bool) -> Self {
        Self { name, fallback }
    }
}

/// Return `fallback` in debug builds after logging, `error` in release builds.
fn fallback_or<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session configuration fallback (dev only)");
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn read_flag<E: Env>(
    env: &E,
    mode: BuildMode,
    var: FlagVar,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(var.name) else {
        return fallback_or(
            mode,
            var.fallback,
            SessionConfigError::MissingEnv { name: var.name },
        );
    };
    match parse_flag(&raw) {
        Some(flag) => Ok(flag),
        None => fallback_or(
            mode,
            var.fallback,
            SessionConfigError::InvalidEnv {
                name: var.name,
                value: raw,
                expected: FLAG_EXPECTED,
            },
        ),
    }
}

pub(super) fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return fallback_or(
            mode,
            SameSite::Lax,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
        );
    };
    match raw.to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => fallback_or(
            mode,
            SameSite::Lax,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case("YES", Some(true))]
    #[case(" n ", Some(false))]
    #[case("false", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn flags_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }
}
