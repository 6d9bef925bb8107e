//! Behaviour tests for session configuration toggles.
//!
//! Release builds must receive every toggle explicitly and reject insecure
//! combinations; debug builds fall back to defaults and a generated key.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use actix_web::cookie::SameSite;
use mockable::MockEnv;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::NamedTempFile;
use templatehub::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};

const KEY_FILE: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE: &str = "SESSION_COOKIE_SECURE";
const SAMESITE: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL: &str = "SESSION_ALLOW_EPHEMERAL";

struct SessionConfigWorld {
    vars: RefCell<HashMap<&'static str, String>>,
    mode: RefCell<BuildMode>,
    outcome: RefCell<Option<Result<SessionSettings, SessionConfigError>>>,
    key_files: RefCell<Vec<NamedTempFile>>,
}

impl SessionConfigWorld {
    fn new() -> Self {
        Self {
            vars: RefCell::new(HashMap::new()),
            mode: RefCell::new(BuildMode::Release),
            outcome: RefCell::new(None),
            key_files: RefCell::new(Vec::new()),
        }
    }

    fn set_var(&self, name: &'static str, value: &str) {
        self.vars.borrow_mut().insert(name, value.to_owned());
    }

    fn unset_var(&self, name: &'static str) {
        self.vars.borrow_mut().remove(name);
    }

    fn use_key_file(&self, len: usize) {
        let mut file = NamedTempFile::new().expect("temporary key file");
        file.write_all(&vec![b'k'; len]).expect("write key bytes");
        let path = file
            .path()
            .to_str()
            .expect("temporary path should be valid UTF-8")
            .to_owned();
        self.set_var(KEY_FILE, &path);
        self.key_files.borrow_mut().push(file);
    }

    fn evaluate(&self) {
        let vars = self.vars.borrow().clone();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        let result = session_settings_from_env(&env, *self.mode.borrow());
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_settings(&self, check: impl FnOnce(&SessionSettings)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("evaluation result") {
            Ok(settings) => check(settings),
            Err(error) => panic!("expected settings to load, got {error}"),
        }
    }

    fn with_error(&self, check: impl FnOnce(&SessionConfigError)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("evaluation result") {
            Ok(_) => panic!("expected settings to fail"),
            Err(error) => check(error),
        }
    }
}

#[fixture]
fn world() -> SessionConfigWorld {
    SessionConfigWorld::new()
}

#[given("a release build configuration")]
fn a_release_build_configuration(world: &SessionConfigWorld) {
    *world.mode.borrow_mut() = BuildMode::Release;
}

#[given("a debug build configuration")]
fn a_debug_build_configuration(world: &SessionConfigWorld) {
    *world.mode.borrow_mut() = BuildMode::Debug;
}

#[given("a complete secure session environment")]
fn a_complete_secure_session_environment(world: &SessionConfigWorld) {
    world.set_var(COOKIE_SECURE, "1");
    world.set_var(SAMESITE, "Strict");
    world.set_var(ALLOW_EPHEMERAL, "0");
    world.use_key_file(64);
}

#[given("the cookie secure toggle is unset")]
fn the_cookie_secure_toggle_is_unset(world: &SessionConfigWorld) {
    world.unset_var(COOKIE_SECURE);
}

#[given("ephemeral keys are allowed")]
fn ephemeral_keys_are_allowed(world: &SessionConfigWorld) {
    world.set_var(ALLOW_EPHEMERAL, "1");
}

#[given("cookies are not secure with SameSite None")]
fn cookies_are_not_secure_with_same_site_none(world: &SessionConfigWorld) {
    world.set_var(COOKIE_SECURE, "0");
    world.set_var(SAMESITE, "None");
}

#[given("the session key file is too short")]
fn the_session_key_file_is_too_short(world: &SessionConfigWorld) {
    world.use_key_file(16);
}

#[when("the session configuration is loaded")]
fn the_session_configuration_is_loaded(world: &SessionConfigWorld) {
    world.evaluate();
}

#[then("the configuration load succeeds")]
fn the_configuration_load_succeeds(world: &SessionConfigWorld) {
    world.with_settings(|_| {});
}

#[then("the cookie is secure with a Strict SameSite policy")]
fn the_cookie_is_secure_and_strict(world: &SessionConfigWorld) {
    world.with_settings(|settings| {
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    });
}

#[then("the cookie is secure with a Lax SameSite policy")]
fn the_cookie_is_secure_and_lax(world: &SessionConfigWorld) {
    world.with_settings(|settings| {
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    });
}

#[then("the configuration load fails due to a missing cookie secure toggle")]
fn configuration_fails_missing_cookie_secure(world: &SessionConfigWorld) {
    world.with_error(|error| {
        assert!(matches!(
            error,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE
            }
        ));
    });
}

#[then("the configuration load fails because ephemeral keys are not allowed")]
fn configuration_fails_ephemeral_not_allowed(world: &SessionConfigWorld) {
    world.with_error(|error| {
        assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
    });
}

#[then("the configuration load fails because SameSite None requires secure cookies")]
fn configuration_fails_insecure_same_site_none(world: &SessionConfigWorld) {
    world.with_error(|error| {
        assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
    });
}

#[then("the configuration load fails because the key is too short")]
fn configuration_fails_key_too_short(world: &SessionConfigWorld) {
    world.with_error(|error| {
        assert!(matches!(error, SessionConfigError::KeyTooShort { .. }));
    });
}

#[scenario(path = "tests/features/session_config.feature")]
fn session_configuration_scenarios(world: SessionConfigWorld) {
    drop(world);
}
