//! Translation of SeaORM errors into repository errors.

use sea_orm::{DbErr, SqlErr};

use blog_core::error::RepoError;

/// Map a `DbErr` onto the repository error taxonomy.
///
/// Unique violations keep the driver's message as-is.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
        return RepoError::Constraint(msg);
    }

    let msg = err.to_string();
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(msg),
        // Drivers without structured error codes only leave the message.
        _ if msg.contains("duplicate") || msg.contains("unique") => RepoError::Constraint(msg),
        _ => RepoError::Query(msg),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnAcquireErr, RuntimeErr};

    use super::*;

    #[test]
    fn duplicate_key_message_becomes_constraint() {
        let err = map_db_err(DbErr::Custom(
            "duplicate key value violates unique constraint \"users_email_key\"".into(),
        ));

        assert!(matches!(err, RepoError::Constraint(ref msg) if msg.contains("users_email_key")));
    }

    #[test]
    fn pool_exhaustion_is_a_connection_error() {
        let err = map_db_err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));

        assert!(matches!(err, RepoError::Connection(_)));
    }

    #[test]
    fn other_runtime_errors_are_query_errors() {
        let err = map_db_err(DbErr::Query(RuntimeErr::Internal("syntax error".into())));

        assert!(matches!(err, RepoError::Query(_)));
    }
}
