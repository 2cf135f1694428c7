//! JSON envelope shared by every handler

use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAIL: &str = "fail";

/// Success body: `{ "status": "success", "message"?: ..., "data"?: ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: None,
            data: Some(data),
        }
    }

    /// Attach a human readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_only_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Book deleted successfully")).unwrap();
        assert_eq!(
            body,
            json!({"status": "success", "message": "Book deleted successfully"})
        );
    }

    #[test]
    fn test_data_without_message() {
        let body = serde_json::to_value(ApiResponse::success(json!({"books": []}))).unwrap();
        assert_eq!(body, json!({"status": "success", "data": {"books": []}}));
    }
}
