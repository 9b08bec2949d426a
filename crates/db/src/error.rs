//! Translation of sqlx failures into domain errors.

use villa_core::error::CoreError;

/// Classify a sqlx error as a [`CoreError`].
///
/// - PostgreSQL unique violations (`23505`) on a `uq_` constraint become
///   `Conflict`.
/// - Everything else becomes `Internal`; the raw message is logged, not
///   surfaced.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}
