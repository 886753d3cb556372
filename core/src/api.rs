pub use crate::errors::{error_codes, BoxError, HandlerError};
pub use crate::handler::{create_handler, BusinessLogic, HandlerConfig, RequestHandler};
pub use crate::request::{
    parse_form_body, parse_query_string, parse_query_string_parameters, parse_text_body,
    HttpMethod, HttpRequest, ParseFn,
};
pub use crate::response::{
    create_cors_wildcard_headers, create_empty_headers, HeaderFn, Headers, HttpResponse,
    StatusCode,
};
pub use crate::trace::{init_logging, trace_enabled};
pub use crate::validation::{
    create_number_validator, create_string_validator, create_validator, FieldValidator,
    NumberValidator, RawRecord, RecordValidator, Schema, StringValidator, TypedRecordValidator,
    Validator,
};
