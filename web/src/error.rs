use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

use domain::error::{DomainErrorKind, Error as DomainError};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Web(WebErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    /// The session store could not be read or written.
    Session,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Domain(err) => match &err.error_kind {
                DomainErrorKind::Flow(_) => StatusCode::BAD_REQUEST,
                DomainErrorKind::External(_) => StatusCode::BAD_GATEWAY,
                DomainErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Web(WebErrorKind::Session) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error::Domain(err)
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        warn!("Session error: {}", err);
        Error::Web(WebErrorKind::Session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::{flow_error, session_error, FlowErrorKind};

    #[test]
    fn test_flow_errors_are_bad_requests() {
        let err: Error = flow_error(FlowErrorKind::MissingRefreshToken, "none").into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_session_errors_are_server_errors() {
        let err: Error = session_error("lost").into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Error::Web(WebErrorKind::Session).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
