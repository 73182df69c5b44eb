use serde::{Deserialize, Serialize};

use super::ApiError;

/// Every JSON endpoint answers with `success`, an optional `message`, and
/// endpoint-specific fields next to them.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::rejected(
                self.message.unwrap_or_else(|| "未知错误".to_string()),
            ))
        }
    }
}

/// Responses that carry nothing beyond `success` and `message`.
#[derive(Debug, Default, Deserialize)]
pub struct NoData {}

#[derive(Serialize)]
pub struct CsrfOnlyRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
}

#[derive(Serialize)]
pub struct StartRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub start_date: String,
}

#[derive(Serialize)]
pub struct EndRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub end_date: String,
}

#[derive(Serialize)]
pub struct AdjustRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub record_id: i64,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<&'a str>,
}

#[derive(Serialize)]
pub struct DeleteAccountRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub password: &'a str,
    pub confirm_delete: &'static str,
}

#[derive(Serialize)]
pub struct ProfileRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub cycle_length: &'a str,
    pub period_length: &'a str,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub csrfmiddlewaretoken: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
