//! Translation of `sqlx` errors into domain errors.

use recipe_core::error::DomainError;
use sqlx::error::ErrorKind;

/// Maps a database error onto the domain taxonomy.
///
/// Integrity violations reported by PostgreSQL (SQLSTATE class 23) become
/// `DomainError::DataIntegrity` marked as constraint-caused; every other
/// failure is an infrastructure error.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => {
                let constraint = db_err.constraint().map(str::to_owned);
                tracing::debug!(
                    constraint = constraint.as_deref().unwrap_or("none"),
                    detail = db_err.message(),
                    "storage constraint violated"
                );
                return DomainError::DataIntegrity {
                    message: db_err.message().to_owned(),
                    constraint,
                    caused_by_constraint: true,
                };
            }
            _ => {}
        }
    }
    DomainError::Infrastructure(format!("database error: {err}"))
}

/// Converts a page offset into the `BIGINT` PostgreSQL expects.
pub(crate) fn to_bigint(value: u64) -> Result<i64, DomainError> {
    i64::try_from(value)
        .map_err(|_| DomainError::InvalidArgument(format!("page offset {value} is too large")))
}
