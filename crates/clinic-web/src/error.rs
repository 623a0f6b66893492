//! HTTP 错误响应

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use clinic_core::ClinicError;
use serde_json::json;
use tracing::{error, warn};

/// 处理器错误，包装核心错误以映射 HTTP 状态码
#[derive(Debug)]
pub struct ApiError(pub ClinicError);

/// 处理器结果类型
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ClinicError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Config(_)
            | ClinicError::Io(_)
            | ClinicError::Serialization(_)
            | ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self.0 {
            ClinicError::NotFound(msg) | ClinicError::Validation(msg) => msg,
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("Request failed: {}", error_message);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), error_message);
        }

        let body = Json(json!({
            "error": true,
            "message": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
