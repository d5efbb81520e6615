//! Diesel error mapping shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Port-level error constructors a repository supplies to the mapper.
pub(super) struct ErrorConstructors<E> {
    pub query: fn(&'static str) -> E,
    pub connection: fn(&'static str) -> E,
    pub conflict: fn(&'static str) -> E,
}

/// Map a Diesel failure onto the repository's port error.
///
/// Unique violations become conflicts and closed connections become
/// connection errors. Everything else is a query error. Database detail is
/// logged at debug level and never copied into the returned message.
pub(super) fn map_diesel_error<E>(error: DieselError, ctors: &ErrorConstructors<E>) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => (ctors.query)("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            (ctors.conflict)("unique constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (ctors.connection)("database connection error")
        }
        DieselError::QueryBuilderError(_) => (ctors.query)("database query error"),
        _ => (ctors.query)("database error"),
    }
}
