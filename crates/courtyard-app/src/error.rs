use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Writer, async_trait};
use serde::Serialize;
use thiserror::Error;

use courtyard_calendar::error::RecurError;
use courtyard_core::error::CoreError;
use courtyard_service::error::ServiceError;
use courtyard_service::residents::DeletionBlockers;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<DeletionBlockers>,
}

impl AppError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => service_status(err),
            Self::CoreError(err) => core_status(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let blocked = match self {
            Self::ServiceError(ServiceError::DeletionBlocked(blockers)) => Some(blockers.clone()),
            _ => None,
        };
        let error = if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        ErrorResponse { error, blocked }
    }
}

const fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::AuthorizationError(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::PreconditionFailed(_) | ServiceError::DeletionBlocked(_) => {
            StatusCode::PRECONDITION_FAILED
        }
        ServiceError::ValidationError(_)
        | ServiceError::RecurError(RecurError::InvalidWindow(_)) => StatusCode::BAD_REQUEST,
        ServiceError::CoreError(err) => core_status(err),
        // Rules come from the catalog, not the request.
        ServiceError::RecurError(_)
        | ServiceError::InvariantViolation(_)
        | ServiceError::Io(_)
        | ServiceError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::ValidationError(_) | CoreError::ParseError(_) => StatusCode::BAD_REQUEST,
        CoreError::InvalidConfiguration(_) | CoreError::InvariantViolation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, path = %req.uri().path(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        res.status_code(status);
        res.render(Json(self.to_response()));
    }
}
