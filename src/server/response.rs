//! Success envelope shared by every handler
//!
//! Errors use [`crate::core::error::ErrorResponse`], which carries the same
//! `success` and `message` keys.

use crate::core::query::PaginationMeta;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `{ success: true, message?, count?, total?, page?, pages?, data? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(flatten)]
    pub pagination: Option<PaginationMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            pagination: None,
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self::ok(data).with_status(StatusCode::CREATED)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Pagination keys are flattened into the top level
    pub fn with_pagination(mut self, meta: PaginationMeta) -> Self {
        self.pagination = Some(meta);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl ApiResponse<()> {
    /// Success with a message and no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            pagination: None,
            data: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::PageRequest;
    use serde_json::json;

    #[test]
    fn test_minimal_envelope() {
        let value = serde_json::to_value(ApiResponse::message("Resource deleted successfully")).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "message": "Resource deleted successfully" })
        );
    }

    #[test]
    fn test_pagination_is_flattened() {
        let response = ApiResponse::ok(json!({ "resources": [] }))
            .with_pagination(PaginationMeta::new(PageRequest::new(2, 10), 15, 5));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["count"], 5);
        assert_eq!(value["total"], 15);
        assert_eq!(value["page"], 2);
        assert_eq!(value["pages"], 2);
        assert!(value.get("pagination").is_none());
        assert!(value["data"]["resources"].is_array());
    }
}
