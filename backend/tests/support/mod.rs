//! Helpers shared by the database-backed integration suites.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

pub mod embedded_postgres;

pub use embedded_postgres::{provision_template_database, shared_cluster};

const SKIP_VAR: &str = "SKIP_TEST_CLUSTER";

/// Whether the environment opts out of tests that need a PostgreSQL cluster.
pub fn cluster_tests_disabled() -> bool {
    std::env::var(SKIP_VAR).is_ok_and(|value| {
        let value = value.trim();
        ["1", "true", "yes"]
            .iter()
            .any(|accepted| value.eq_ignore_ascii_case(accepted))
    })
}

/// Turn a cluster setup failure into a skipped test when
/// `SKIP_TEST_CLUSTER` is set, and into a panic otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        cluster_tests_disabled(),
        "embedded PostgreSQL unavailable: {reason} (set {SKIP_VAR}=1 to skip)"
    );
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
