use crate::errors::HandlerError;
use crate::response::types::{Headers, HttpResponse, StatusCode};
use serde::Serialize;

/// Signature of a header step, run for successful responses only.
pub type HeaderFn = fn() -> Option<Headers>;

/// Serialize a business result as the response body.
pub fn serialize_json_response<T: Serialize + ?Sized>(value: &T) -> Result<String, HandlerError> {
    serde_json::to_string(value).map_err(HandlerError::business)
}

pub fn create_response(status: StatusCode, headers: Option<Headers>, body: String) -> HttpResponse {
    HttpResponse {
        status_code: status,
        headers,
        body,
    }
}

impl HttpResponse {
    pub fn ok(headers: Option<Headers>, body: String) -> Self {
        create_response(StatusCode::Ok, headers, body)
    }

    pub fn bad_request() -> Self {
        create_response(StatusCode::BadRequest, None, String::new())
    }

    pub fn internal_server_error() -> Self {
        create_response(StatusCode::InternalServerError, None, String::new())
    }
}

/// **DEFAULT HEADER STEP** - no headers.
pub fn create_empty_headers() -> Option<Headers> {
    None
}

/// Wildcard cross-origin header.
pub fn create_cors_wildcard_headers() -> Option<Headers> {
    let mut headers = Headers::new();
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    Some(headers)
}
