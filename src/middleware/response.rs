use axum::{
    response::{IntoResponse, Json, Response},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;

/// The `{success, data, error}` wrapper around every JSON response.
/// All three keys are always serialized; absent values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T: Serialize = Value> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(success: bool, data: Option<T>, error: Option<String>) -> Self {
        Self { success, data, error }
    }

    pub fn ok(data: T) -> Self {
        Self::new(true, Some(data), None)
    }
}

impl Envelope<Value> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::new(false, None, Some(error.into()))
    }

    /// Render with a status code
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value first so a serialization failure still yields an envelope
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return Envelope::failure("Failed to serialize response data")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        Envelope::ok(data_value).into_response_with(status)
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
