//! # HANDLER FACTORY
//!
//! Wraps a record validator and business logic into a request handler with a
//! fixed outcome mapping:
//!
//! | stage | failure | response |
//! |---|---|---|
//! | method check, parse, validate | any `HandlerError` | 400, empty body |
//! | business logic, result serialization | any error | 500, empty body |
//! | - | success | 200, `create_headers()`, JSON body |
//!
//! The two failure classes are caught at separate boundaries (`prepare` and
//! `execute`), so a business error can never be reported as a 400.

use crate::errors::{BoxError, HandlerError};
use crate::request::{parse_text_body, HttpMethod, HttpRequest, ParseFn};
use crate::response::{create_empty_headers, serialize_json_response, HeaderFn, HttpResponse};
use crate::trace::{trace_enabled, trace_error};
use crate::validation::{RawRecord, Validator};
use serde::Serialize;
use std::fmt;
use std::future::Future;

/// **BUSINESS LOGIC**
///
/// Async function from a validated record to a serializable result. Any
/// `Fn(T) -> impl Future<Output = Result<R, E>>` qualifies.
pub trait BusinessLogic<T> {
    type Output: Serialize;
    type Error: Into<BoxError>;
    type Future: Future<Output = Result<Self::Output, Self::Error>>;

    fn call(&self, record: T) -> Self::Future;
}

impl<T, F, Fut, R, E> BusinessLogic<T> for F
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    R: Serialize,
    E: Into<BoxError>,
{
    type Output = R;
    type Error = E;
    type Future = Fut;

    fn call(&self, record: T) -> Self::Future {
        self(record)
    }
}

/// **HANDLER CONFIGURATION**
///
/// Built once, then owned read-only by its `RequestHandler`.
///
/// **DEFAULTS**:
/// - `method`: `HttpMethod::GET`
/// - `parse`: `parse_text_body` (JSON object body)
/// - `create_headers`: `create_empty_headers` (no headers)
/// - `trace`: `trace_enabled()` (`SCHEMA_HANDLER_TRACE=1`)
pub struct HandlerConfig<V, H> {
    pub method: HttpMethod,
    pub parse: ParseFn,
    pub create_headers: HeaderFn,
    pub trace: bool,
    pub validate: V,
    pub handle: H,
}

impl<V, H> HandlerConfig<V, H> {
    pub fn new(validate: V, handle: H) -> Self {
        Self {
            method: HttpMethod::default(),
            parse: parse_text_body,
            create_headers: create_empty_headers,
            trace: trace_enabled(),
            validate,
            handle,
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn parse(mut self, parse: ParseFn) -> Self {
        self.parse = parse;
        self
    }

    pub fn create_headers(mut self, create_headers: HeaderFn) -> Self {
        self.create_headers = create_headers;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl<V: fmt::Debug, H> fmt::Debug for HandlerConfig<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("method", &self.method)
            .field("trace", &self.trace)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

/// **REQUEST HANDLER**
///
/// Immutable after construction; serve any number of concurrent requests
/// through `&self`.
pub struct RequestHandler<V, H> {
    config: HandlerConfig<V, H>,
}

/// Build a request handler from its configuration.
pub fn create_handler<V, H>(config: HandlerConfig<V, H>) -> RequestHandler<V, H>
where
    V: Validator<Input = RawRecord>,
    H: BusinessLogic<V::Output>,
{
    log::debug!(
        "Creating handler for {} requests (trace: {})",
        config.method,
        config.trace
    );
    RequestHandler { config }
}

impl<V, H> RequestHandler<V, H>
where
    V: Validator<Input = RawRecord>,
    H: BusinessLogic<V::Output>,
{
    pub fn config(&self) -> &HandlerConfig<V, H> {
        &self.config
    }

    /// Serve one request. Always resolves to exactly one envelope.
    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let record = match self.prepare(request) {
            Ok(record) => record,
            Err(error) => {
                self.report("request validation", &error);
                return HttpResponse::bad_request();
            }
        };

        match self.execute(record).await {
            Ok(body) => HttpResponse::ok((self.config.create_headers)(), body),
            Err(error) => {
                self.report("business logic", &error);
                HttpResponse::internal_server_error()
            }
        }
    }

    /// Method check, parse and validation: every failure here is a 400.
    fn prepare(&self, request: &HttpRequest) -> Result<V::Output, HandlerError> {
        if !self.config.method.matches(&request.method) {
            return Err(HandlerError::MethodMismatch {
                expected: self.config.method.to_string(),
                actual: request.method.clone(),
            });
        }

        let raw = (self.config.parse)(request)?;
        self.config.validate.validate(raw)
    }

    /// Business logic and result serialization: every failure here is a 500.
    async fn execute(&self, record: V::Output) -> Result<String, HandlerError> {
        let result = self
            .config
            .handle
            .call(record)
            .await
            .map_err(HandlerError::business)?;
        serialize_json_response(&result)
    }

    fn report(&self, stage: &str, error: &HandlerError) {
        if self.config.trace {
            trace_error(stage, error);
        } else {
            log::debug!("{} rejected request [{}]", stage, error.code());
        }
    }
}

impl<V: fmt::Debug, H> fmt::Debug for RequestHandler<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::parse_query_string_parameters;
    use crate::response::{create_cors_wildcard_headers, StatusCode};
    use crate::validation::{create_number_validator, create_string_validator, create_validator, RecordValidator, Schema};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_validator() -> RecordValidator {
        create_validator(
            Schema::new()
                .field("a", create_string_validator("^[a-z]+$").unwrap())
                .field("b", create_number_validator(0.0, 10.0)),
        )
    }

    async fn ok_logic(_record: RawRecord) -> Result<serde_json::Value, BoxError> {
        Ok(json!({"ok": true}))
    }

    async fn failing_logic(_record: RawRecord) -> Result<serde_json::Value, BoxError> {
        Err("database unavailable".into())
    }

    fn post(body: &str) -> HttpRequest {
        HttpRequest::new("POST", "/").with_body(body)
    }

    #[test]
    fn test_config_defaults() {
        let config = HandlerConfig::new(sample_validator(), ok_logic);
        assert_eq!(config.method, HttpMethod::GET);
        assert!((config.create_headers)().is_none());
        assert_eq!(config.trace, trace_enabled());
    }

    #[tokio::test]
    async fn test_success_returns_json_body() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), ok_logic).method(HttpMethod::POST),
        );
        let response = handler.handle(&post(r#"{"a":"ok","b":"3"}"#)).await;

        assert_eq!(response.status_code, StatusCode::Ok);
        assert_eq!(response.body, r#"{"ok":true}"#);
        assert!(response.headers.is_none());
    }

    #[tokio::test]
    async fn test_business_logic_receives_coerced_record() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), |record: RawRecord| async move {
                Ok::<_, BoxError>(record)
            })
            .method(HttpMethod::POST),
        );
        let response = handler.handle(&post(r#"{"a":"ok","b":"3"}"#)).await;
        assert_eq!(response.body, r#"{"a":"ok","b":3}"#);
    }

    #[tokio::test]
    async fn test_wrong_method_is_bad_request() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), ok_logic).method(HttpMethod::POST),
        );
        let request = HttpRequest::new("GET", "/").with_body(r#"{"a":"ok","b":"3"}"#);
        assert_eq!(handler.handle(&request).await, HttpResponse::bad_request());

        let lowercase = HttpRequest::new("post", "/").with_body(r#"{"a":"ok","b":"3"}"#);
        assert_eq!(handler.handle(&lowercase).await, HttpResponse::bad_request());
    }

    #[tokio::test]
    async fn test_validation_failures_are_bad_requests() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), ok_logic).method(HttpMethod::POST),
        );
        for body in [
            r#"{"a":"ok","b":"99"}"#,
            r#"{"a":"ok"}"#,
            r#"{"a":"ok","b":"3","c":"x"}"#,
            r#"{"a":"ok","b":null}"#,
            r#"{"a":"OK","b":"3"}"#,
            "not json",
            "[]",
        ] {
            let response = handler.handle(&post(body)).await;
            assert_eq!(response.status_code, StatusCode::BadRequest, "body: {}", body);
            assert_eq!(response.body, "");
            assert!(response.headers.is_none());
        }
    }

    #[tokio::test]
    async fn test_business_failure_is_internal_error() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), failing_logic)
                .method(HttpMethod::POST)
                .create_headers(create_cors_wildcard_headers)
                .trace(true),
        );
        let response = handler.handle(&post(r#"{"a":"ok","b":"3"}"#)).await;
        assert_eq!(response, HttpResponse::internal_server_error());
    }

    #[tokio::test]
    async fn test_business_logic_not_called_on_bad_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), move |_record: RawRecord| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, BoxError>(()) }
            })
            .method(HttpMethod::POST),
        );

        handler.handle(&post(r#"{"a":"ok","b":"42"}"#)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        handler.handle(&post(r#"{"a":"ok","b":"4"}"#)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_query_string_parse_and_cors_headers() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), ok_logic)
                .parse(parse_query_string_parameters)
                .create_headers(create_cors_wildcard_headers),
        );
        let request = HttpRequest::new("GET", "/").with_raw_query("a=hi&b=10");
        let response = handler.handle(&request).await;

        assert_eq!(response.status_code, StatusCode::Ok);
        assert_eq!(response.headers, create_cors_wildcard_headers());
    }

    #[tokio::test]
    async fn test_missing_query_parameters_is_bad_request() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), ok_logic).parse(parse_query_string_parameters),
        );
        let response = handler.handle(&HttpRequest::new("GET", "/")).await;
        assert_eq!(response, HttpResponse::bad_request());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_handler() {
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), |record: RawRecord| async move {
                tokio::task::yield_now().await;
                Ok::<_, BoxError>(record["b"].clone())
            })
            .method(HttpMethod::POST),
        );

        let first = post(r#"{"a":"x","b":"1"}"#);
        let second = post(r#"{"a":"y","b":"2"}"#);
        let third = post(r#"{"a":"z","b":"11"}"#);
        let (r1, r2, r3) = tokio::join!(
            handler.handle(&first),
            handler.handle(&second),
            handler.handle(&third)
        );

        assert_eq!(r1.body, "1");
        assert_eq!(r2.body, "2");
        assert_eq!(r3.status_code, StatusCode::BadRequest);
    }

    #[tokio::test]
    async fn test_non_send_business_logic_on_current_thread() {
        let prefix = std::rc::Rc::new("item".to_string());
        let handler = create_handler(
            HandlerConfig::new(sample_validator(), move |record: RawRecord| {
                let prefix = std::rc::Rc::clone(&prefix);
                async move { Ok::<_, BoxError>(format!("{}-{}", prefix, record["b"])) }
            })
            .method(HttpMethod::POST),
        );
        let response = handler.handle(&post(r#"{"a":"ok","b":"3"}"#)).await;
        assert_eq!(response.body, r#""item-3""#);
    }

    #[test]
    fn test_handler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}

        let handler = create_handler(HandlerConfig::new(sample_validator(), ok_logic));
        assert_send_sync(&handler);
    }
}
