pub mod serializer;
pub mod types;

pub use serializer::{
    create_cors_wildcard_headers, create_empty_headers, create_response, serialize_json_response,
    HeaderFn,
};
pub use types::{Headers, HttpResponse, StatusCode};
