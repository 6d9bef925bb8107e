//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports, backed by
//! PostgreSQL via `diesel-async` and `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Diesel and pool failures are mapped to the port error enums and logged
//!   at debug level.
//! - Template writes each run in a single transaction.
//!
//! ```ignore
//! use templatehub::outbound::persistence::{DbPool, DieselTemplateRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/templatehub")).await?;
//! let repo = DieselTemplateRepository::new(pool);
//! ```

mod diesel_category_repository;
mod diesel_error_mapping;
pub(crate) mod diesel_helpers;
mod diesel_member_repository;
mod diesel_tag_repository;
mod diesel_template_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_member_repository::DieselMemberRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_template_repository::DieselTemplateRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_IDLE, DbPool, PoolConfig,
    PoolError, PooledPgConnection,
};
