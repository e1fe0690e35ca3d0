//! 核心错误处理模块

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use super::validation::FieldErrors;
use crate::infrastructure::repository::RepositoryError;

pub const CATEGORY_NOT_FOUND: &str = "Categoría no encontrada";
pub const INTERNAL_ERROR: &str = "Error interno del servidor";

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    /// 字段级校验失败
    Validation(FieldErrors),
    BadRequest(String),
    /// 引用的分类不存在
    ReferenceNotFound,
    Unauthorized(String),
    /// 内部错误，详细信息只写日志
    Internal(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) | CoreError::BadRequest(_) | CoreError::ReferenceNotFound => {
                StatusCode::BAD_REQUEST
            }
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::Validation(errors) => return (status, Json(errors)).into_response(),
            CoreError::BadRequest(msg) | CoreError::Unauthorized(msg) => msg,
            CoreError::ReferenceNotFound => CATEGORY_NOT_FOUND.to_string(),
            CoreError::Internal(msg) => {
                error!("Internal error: {}", msg);
                INTERNAL_ERROR.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors)
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(_) => {
                CoreError::BadRequest("Ya existe una categoría con ese nombre".to_string())
            }
            RepositoryError::MissingCategory(_) => CoreError::ReferenceNotFound,
            #[cfg(feature = "database")]
            RepositoryError::Database(e) => CoreError::Internal(e.to_string()),
        }
    }
}
