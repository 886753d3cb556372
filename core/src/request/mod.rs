pub mod parser;
pub mod types;

pub use parser::{
    parse_form_body, parse_query_string, parse_query_string_parameters, parse_text_body, ParseFn,
};
pub use types::{HttpMethod, HttpRequest};
