//! Shared Diesel error mapping for the template store repositories.
//!
//! Every repository classifies Diesel failures the same way, then decides
//! which port error each class becomes. Constraint violations keep the
//! constraint name so callers can tell a duplicate email from a duplicate
//! username.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// The statement failed for a reason the caller cannot act on.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation {
        /// Name of the violated constraint, or the database message when the
        /// driver does not report one.
        constraint: String,
    },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation {
        /// Name of the violated constraint, or the database message when the
        /// driver does not report one.
        constraint: String,
    },
}

/// Classify a Diesel error, logging the database detail at debug level.
pub fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: constraint_label(info.as_ref()),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: constraint_label(info.as_ref()),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

fn constraint_label(info: &(dyn diesel::result::DatabaseErrorInformation + Send + Sync)) -> String {
    info.constraint_name()
        .map_or_else(|| info.message().to_owned(), str::to_owned)
}

/// Map a pool failure into a repository-specific connection error.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel failure for repositories that have no constraint-specific
/// error variants.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => connection(message.to_owned()),
        DieselFailure::Query(message) => query(message.to_owned()),
        DieselFailure::UniqueViolation { .. } => query("unique constraint violated".to_owned()),
        DieselFailure::ForeignKeyViolation { .. } => {
            query("foreign key constraint violated".to_owned())
        }
    }
}
