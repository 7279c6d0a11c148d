//! Conversion of database errors into HTTP errors.

use hookrelay_postgres::PgError;

use super::{Error, ErrorKind};

impl From<PgError> for Error<'static> {
    fn from(err: PgError) -> Self {
        if err.is_not_found() {
            return ErrorKind::NotFound.into_error();
        }

        if let Some(constraint) = err.constraint() {
            tracing::debug!(constraint, "Database constraint violation");
            return ErrorKind::Conflict
                .with_context(format!("constraint: {constraint}"))
                .into_static();
        }

        tracing::error!(error = %err, "Database operation failed");
        ErrorKind::InternalServerError
            .with_message("Database operation failed")
            .into_static()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error: Error<'static> = PgError::Query(hookrelay_postgres::DieselError::NotFound).into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let error: Error<'static> = PgError::Config("bad".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
