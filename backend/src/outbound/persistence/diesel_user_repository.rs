//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, GoogleProfile, GoogleSubject, User, UserId, UserValidationError,
};

use super::diesel_error_mapping::{ErrorConstructors, map_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

fn query_error(message: &'static str) -> UserPersistenceError {
    UserPersistenceError::query(message)
}

fn connection_error(message: &'static str) -> UserPersistenceError {
    UserPersistenceError::connection(message)
}

fn conflict_error(message: &'static str) -> UserPersistenceError {
    UserPersistenceError::conflict(message)
}

const ERRORS: ErrorConstructors<UserPersistenceError> = ErrorConstructors {
    query: query_error,
    connection: connection_error,
    conflict: conflict_error,
};

/// Diesel-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, &ERRORS)
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid =
        |err: UserValidationError| UserPersistenceError::query(format!("invalid stored user: {err}"));
    Ok(User::new(
        UserId::from_uuid(row.id),
        GoogleSubject::new(row.google_subject).map_err(invalid)?,
        EmailAddress::new(row.email).map_err(invalid)?,
        DisplayName::new(row.name).map_err(invalid)?,
        row.picture_url,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_google_subject(
        &self,
        subject: &GoogleSubject,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::google_subject.eq(subject.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn upsert_google_user(
        &self,
        profile: &GoogleProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: Uuid::new_v4(),
            google_subject: profile.subject.as_ref(),
            email: profile.email.as_ref(),
            name: profile.name.as_ref(),
            picture_url: profile.picture_url.as_deref(),
            created_at: now,
            updated_at: now,
        };

        // Existing rows keep their id and created_at.
        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::google_subject)
            .do_update()
            .set((
                users::email.eq(excluded(users::email)),
                users::name.eq(excluded(users::name)),
                users::picture_url.eq(excluded(users::picture_url)),
                users::updated_at.eq(excluded(users::updated_at)),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        row_to_user(row)
    }
}
