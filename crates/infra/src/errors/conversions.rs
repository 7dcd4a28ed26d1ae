//! Conversions from external infrastructure errors into domain errors.

use eventide_domain::EventideError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EventideError);

impl From<InfraError> for EventideError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EventideError> for InfraError {
    fn from(value: EventideError) -> Self {
        InfraError(value)
    }
}

trait IntoEventideError {
    fn into_eventide(self) -> EventideError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → EventideError */
/* -------------------------------------------------------------------------- */

impl IntoEventideError for SqlError {
    fn into_eventide(self) -> EventideError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => EventideError::Storage("cache is busy".into()),
                    ErrorCode::DatabaseLocked => EventideError::Storage("cache is locked".into()),
                    ErrorCode::NotADatabase => {
                        EventideError::Storage("cache file is not a database".into())
                    }
                    _ => EventideError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => EventideError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                EventideError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                EventideError::Storage(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                EventideError::Storage("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => EventideError::Storage(format!(
                "invalid cache path: {}",
                path.to_string_lossy()
            )),
            other => EventideError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_eventide())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → EventideError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(EventideError::Storage(format!("cache connection unavailable: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EventideError */
/* -------------------------------------------------------------------------- */

impl IntoEventideError for HttpError {
    fn into_eventide(self) -> EventideError {
        if self.is_timeout() {
            return EventideError::RemoteUnavailable("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EventideError::RemoteUnavailable("HTTP connection failure".into());
        }

        if self.is_decode() {
            return EventideError::Serialization(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => EventideError::Auth(message),
                404 => EventideError::NotFound(message),
                400..=499 => EventideError::InvalidInput(message),
                _ => EventideError::RemoteUnavailable(message),
            };
        }

        EventideError::RemoteUnavailable(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_eventide())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
