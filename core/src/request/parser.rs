use crate::errors::HandlerError;
use crate::request::types::HttpRequest;
use crate::validation::RawRecord;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Signature of a parse step: request → raw field mapping.
pub type ParseFn = fn(&HttpRequest) -> Result<RawRecord, HandlerError>;

pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if !key.is_empty() => Some((
                    urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned(),
                    urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned(),
                )),
                _ => None,
            }
        })
        .collect()
}

/// **DEFAULT PARSE STEP** - request body as JSON text holding an object.
pub fn parse_text_body(request: &HttpRequest) -> Result<RawRecord, HandlerError> {
    let body = request
        .body
        .as_deref()
        .ok_or_else(|| HandlerError::parse("Missing request body"))?;

    match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err(HandlerError::parse("Expected JSON object in request body")),
        Err(e) => Err(HandlerError::parse(format!("Invalid JSON: {}", e))),
    }
}

/// Query-string parameters as the raw record. Absent parameters parse to an
/// empty record, leaving required fields to the missing-field check.
pub fn parse_query_string_parameters(request: &HttpRequest) -> Result<RawRecord, HandlerError> {
    Ok(request
        .query_string_parameters
        .iter()
        .flatten()
        .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
        .collect())
}

fn decode_form_component(raw: &str) -> Result<String, HandlerError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| HandlerError::parse(format!("Invalid form encoding in {:?}: {}", raw, e)))
}

/// `application/x-www-form-urlencoded` body as the raw record.
///
/// A bare key (`c`) parses as `c = ""` so the schema still sees it; an
/// undecodable key or value fails the whole body.
pub fn parse_form_body(request: &HttpRequest) -> Result<RawRecord, HandlerError> {
    let body = request
        .body
        .as_deref()
        .ok_or_else(|| HandlerError::parse("Missing request body"))?;

    let mut record = RawRecord::new();
    for pair in body.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        record.insert(
            decode_form_component(key)?,
            JsonValue::String(decode_form_component(value)?),
        );
    }
    Ok(record)
}
