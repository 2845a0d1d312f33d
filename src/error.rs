use std::fmt::{Display, Formatter};

use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use statement_ocr_to_table::ExtractError;

use crate::render;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Validation(String),
    Extraction(String),
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_error",
            Self::Extraction(_) => "extraction_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Validation(message)
            | Self::Extraction(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Extraction(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<ExtractError> for ApiError {
    fn from(error: ExtractError) -> Self {
        Self::Extraction(error.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(error: axum::extract::multipart::MultipartError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = render::render_page(&[], &[self.message().to_string()]);
        let mut response = (self.status_code(), Html(body)).into_response();
        response
            .headers_mut()
            .insert("x-error-code", HeaderValue::from_static(self.code()));
        response
    }
}
