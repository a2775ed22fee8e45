//! Error handling - RFC 7807 compliant responses.

use std::collections::BTreeMap;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};

use blogicum_core::error::{DomainError, RepoError};
use blogicum_shared::{ApiResponse, ErrorResponse};

use super::auth::AuthenticationError;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed")]
    Validation(BTreeMap<String, Vec<String>>),

    /// The caller may not act here; send them to `Location` instead.
    #[error("Redirect to {0}")]
    Redirect(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Redirect(_) => StatusCode::SEE_OTHER,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Redirect(location) => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location.as_str()))
                    .json(ApiResponse::<()> {
                        success: false,
                        data: None,
                        message: Some("Only the author may change this record".to_string()),
                        redirect: Some(location.clone()),
                    });
            }
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

impl AppError {
    /// Problem details body, or `None` for redirects.
    pub fn problem(&self) -> Option<ErrorResponse> {
        let problem = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized()
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::Redirect(_) => return None,
            AppError::Internal(_) => ErrorResponse::internal_error(),
        };
        Some(problem)
    }
}

/// Problem details carried by an error response produced by this crate.
pub(crate) fn problem_for(err: &actix_web::Error) -> Option<ErrorResponse> {
    if let Some(app) = err.as_error::<AppError>() {
        return app.problem();
    }
    err.as_error::<AuthenticationError>()
        .map(AuthenticationError::problem)
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} {key} not found"))
            }
            DomainError::Validation(errors) => AppError::Validation(errors.into_map()),
            DomainError::Unauthorized => AppError::Unauthorized,
            // Handlers that know where to send the caller map this to a redirect first.
            DomainError::NotAuthor(_) | DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Repository(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Map a non-author failure to a `303 See Other` towards `location`.
pub fn redirect_non_author(location: String) -> impl FnOnce(DomainError) -> AppError {
    move |err| match err {
        DomainError::NotAuthor(_) => AppError::Redirect(location),
        other => other.into(),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::ValidationErrors;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Post", "x"), StatusCode::NOT_FOUND),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (
                DomainError::Repository(RepoError::Query("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn validation_errors_keep_their_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("text", "This field is required.");

        match AppError::from(DomainError::Validation(errors)) {
            AppError::Validation(map) => assert_eq!(map["text"].len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_author_becomes_redirect() {
        let err = redirect_non_author("/api/posts/1".into())(DomainError::NotAuthor("post"));
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/posts/1"
        );

        let other = redirect_non_author("/api/".into())(DomainError::Unauthorized);
        assert!(matches!(other, AppError::Unauthorized));
    }
}
