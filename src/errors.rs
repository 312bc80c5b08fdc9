use crate::config::ConfigEditError;
use crate::history::HistoryError;
use crate::storage::StoreError;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ConfigEditError> for AppError {
    fn from(err: ConfigEditError) -> Self {
        match err {
            ConfigEditError::NoSuchBlock(_) | ConfigEditError::NoSuchExercise { .. } => {
                Self::bad_request(err.to_string())
            }
            _ => Self::unprocessable(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
