//! PostgreSQL-backed `MemberRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    MemberCredentials, MemberRepository, MemberRepositoryError, NewMember,
};
use crate::domain::{Email, Member, MemberId, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::models::{MemberRow, NewMemberRow};
use super::pool::{DbPool, PoolError};
use super::schema::members;

/// Diesel-backed implementation of the member repository port.
#[derive(Clone)]
pub struct DieselMemberRepository {
    pool: DbPool,
}

impl DieselMemberRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MemberRepositoryError {
    map_basic_pool_error(error, MemberRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MemberRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => MemberRepositoryError::connection(message),
        DieselFailure::Query(message) => MemberRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            MemberRepositoryError::duplicate(constraint)
        }
        DieselFailure::ForeignKeyViolation { constraint } => {
            MemberRepositoryError::query(format!("foreign key violation: {constraint}"))
        }
    }
}

#[async_trait]
impl MemberRepository for DieselMemberRepository {
    async fn insert(&self, member: &NewMember) -> Result<MemberId, MemberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewMemberRow {
            email: member.email.as_ref(),
            username: member.username.as_ref(),
            password_digest: member.password_digest.as_str(),
        };

        diesel::insert_into(members::table)
            .values(&row)
            .returning(members::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(MemberId::new)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, MemberRepositoryError> {
        crate::query_optional!(
            self,
            errors: (map_pool_error, map_diesel_error, MemberRepositoryError::query),
            members::table,
            members::id.eq(id.get()),
            MemberRow,
            MemberRow::into_domain
        )
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<MemberCredentials>, MemberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = members::table
            .filter(members::email.eq(email.as_ref()))
            .select((members::id, members::password_digest))
            .first::<(i64, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|(id, password_digest)| MemberCredentials {
            member_id: MemberId::new(id),
            password_digest,
        }))
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, MemberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            members::table.filter(members::email.eq(email.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn exists_by_username(
        &self,
        username: &Username,
    ) -> Result<bool, MemberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            members::table.filter(members::username.eq(username.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(String::from("duplicate key value")),
        ));

        assert!(matches!(err, MemberRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    fn pool_checkout_maps_to_connection() {
        let err = map_pool_error(PoolError::checkout("timed out"));

        assert_eq!(err, MemberRepositoryError::connection("timed out"));
    }
}
