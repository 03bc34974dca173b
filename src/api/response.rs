//! JSON envelopes shared by every handler.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::catalog::PageMeta;

/// Standard `{success, data?, message?}` wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data: Some(data), message: Some(message.into()) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()) }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// 201 with the standard envelope
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(ApiResponse::success(self.0))).into_response()
    }
}

/// Product listing: page data plus flattened pagination metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub total_products: u64,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
}

impl<T: Serialize> IntoResponse for ProductPage<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for OrderPage<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// A list with its length, as returned by the testimonial endpoints.
#[derive(Debug, Serialize)]
pub struct CountedList<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> CountedList<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { success: true, count: data.len(), data }
    }
}

impl<T: Serialize> IntoResponse for CountedList<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PageRequest;
    use serde_json::json;

    #[test]
    fn test_envelope_skips_empty_fields() {
        let value = serde_json::to_value(ApiResponse::message("Order deleted")).unwrap();
        assert_eq!(value, json!({"success": true, "message": "Order deleted"}));
    }

    #[test]
    fn test_product_page_flattens_meta() {
        let page = ProductPage::<u8> {
            success: true,
            data: vec![1, 2],
            total_products: 5,
            meta: PageMeta::new(PageRequest { page: 1, limit: 2 }, 5),
        };
        let value = serde_json::to_value(page).unwrap();
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["hasNextPage"], true);
        assert_eq!(value["hasPrevPage"], false);
        assert_eq!(value["totalProducts"], 5);
    }
}
