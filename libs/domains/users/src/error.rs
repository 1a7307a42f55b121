use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user does not exist")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    /// Rejected input; the message names the offending field or rule.
    #[error("{0}")]
    Validation(String),

    /// Lookup failure on the delete path, before anything was removed.
    #[error("unable to get user when trying to delete: {0}")]
    DeleteLookup(#[source] Box<UserError>),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        UserError::Validation(message.into())
    }

    /// True for a missing user, including one wrapped by the delete lookup.
    pub fn is_not_found(&self) -> bool {
        match self {
            UserError::NotFound => true,
            UserError::DeleteLookup(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        UserError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_seen_through_delete_lookup() {
        let err = UserError::DeleteLookup(Box::new(UserError::NotFound));
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "unable to get user when trying to delete: user does not exist"
        );
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!UserError::DuplicateEmail.is_not_found());
        assert!(!UserError::Database("boom".into()).is_not_found());
        assert!(!UserError::DeleteLookup(Box::new(UserError::Database("boom".into()))).is_not_found());
    }

    #[test]
    fn test_db_err_maps_to_database() {
        let err: UserError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, UserError::Database(msg) if msg.contains("connection reset")));
    }
}
