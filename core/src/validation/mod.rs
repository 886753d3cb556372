//! # VALIDATION MODULE
//!
//! **SCHEMA-DRIVEN VALIDATION ENGINE**
//!
//! Field validators check and coerce one untyped value; a record validator
//! applies a `Schema` (field name → field validator) to a flat raw record.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **EXTRANEOUS PASS** - every input key must be declared in the schema
//! 2. **FIELD PASS** - each present value is coerced by its field validator
//! 3. **MISSING PASS** - every schema key must be present and non-null
//!
//! ## USAGE
//!
//! ```rust
//! use schema_handler::validation::{create_number_validator, create_string_validator, create_validator, Schema, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field("a", create_string_validator("[a-z]+").unwrap())
//!     .field("b", create_number_validator(0.0, 10.0));
//! let validator = create_validator(schema);
//! let raw = json!({"a": "hi", "b": "5"}).as_object().cloned().unwrap();
//! assert_eq!(validator.validate(raw).unwrap(), *json!({"a": "hi", "b": 5}).as_object().unwrap());
//! ```

use crate::errors::HandlerError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::marker::PhantomData;

pub mod validators;

pub use validators::{
    create_number_validator, create_string_validator, parse_int, NumberValidator,
    NumericRangeValidator, StringValidator,
};

/// Raw or validated flat record.
pub type RawRecord = Map<String, JsonValue>;

/// **CORE VALIDATOR TRAIT**
///
/// Implemented by field validators, record validators and typed record
/// validators alike. MUST NOT panic: every rejection is a `HandlerError`.
pub trait Validator {
    /// Data type accepted by this validator
    type Input;

    /// Validated data type returned on success
    type Output;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError>;
}

/// **FIELD VALIDATOR**
///
/// Object-safe view of a single-value validator, stored in a `Schema`.
pub trait FieldValidator: Send + Sync {
    fn check(&self, input: JsonValue) -> Result<JsonValue, HandlerError>;
}

impl<V> FieldValidator for V
where
    V: Validator<Input = JsonValue> + Send + Sync,
    V::Output: Into<JsonValue>,
{
    fn check(&self, input: JsonValue) -> Result<JsonValue, HandlerError> {
        self.validate(input).map(Into::into)
    }
}

/// **SCHEMA**
///
/// Ordered mapping of field name to field validator. Every entry is a
/// required field; undeclared fields are rejected.
#[derive(Default)]
pub struct Schema {
    fields: Vec<(String, Box<dyn FieldValidator>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// **ADD REQUIRED FIELD**
    ///
    /// Redeclaring a name replaces its validator in place.
    pub fn field(mut self, name: impl Into<String>, validator: impl FieldValidator + 'static) -> Self {
        let name = name.into();
        let validator: Box<dyn FieldValidator> = Box::new(validator);
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = validator,
            None => self.fields.push((name, validator)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn FieldValidator> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, validator)| validator.as_ref())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// **RECORD VALIDATOR**
///
/// Applies a `Schema` to a raw record. Unknown fields are rejected before
/// missing fields are looked for, so a request carrying both kinds of defect
/// always reports `ExtraneousField`.
#[derive(Debug)]
pub struct RecordValidator {
    schema: Schema,
}

/// Build a record validator from a schema.
pub fn create_validator(schema: Schema) -> RecordValidator {
    RecordValidator::new(schema)
}

impl RecordValidator {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Deserialize validated records into `T`, declared key-for-key against the schema.
    pub fn typed<T: DeserializeOwned>(self) -> TypedRecordValidator<T> {
        TypedRecordValidator {
            inner: self,
            _record: PhantomData,
        }
    }
}

impl Validator for RecordValidator {
    type Input = RawRecord;
    type Output = RawRecord;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError> {
        let mut result = RawRecord::new();

        // **STEP 1**: Unknown keys, then coercion of present values
        for (key, value) in input {
            let validator = self
                .schema
                .get(&key)
                .ok_or_else(|| HandlerError::ExtraneousField { field: key.clone() })?;

            // Null counts as absent; the missing pass reports it
            if value.is_null() {
                continue;
            }

            let coerced = validator.check(value).map_err(|e| e.for_field(&key))?;
            result.insert(key, coerced);
        }

        // **STEP 2**: Every declared field must be present. Each non-null
        // input value is in `result` once step 1 completes.
        if let Some(name) = self
            .schema
            .field_names()
            .find(|name| !result.contains_key(*name))
        {
            return Err(HandlerError::MissingField {
                field: name.to_string(),
            });
        }

        Ok(result)
    }
}

/// **TYPED RECORD VALIDATOR**
///
/// Record validation followed by deserialization into the caller's record type.
pub struct TypedRecordValidator<T> {
    inner: RecordValidator,
    _record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for TypedRecordValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRecordValidator")
            .field("inner", &self.inner)
            .field("record", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Validator for TypedRecordValidator<T> {
    type Input = RawRecord;
    type Output = T;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError> {
        let record = self.inner.validate(input)?;
        serde_json::from_value(JsonValue::Object(record)).map_err(|e| HandlerError::InvalidField {
            field: None,
            message: format!("Record does not match declared type: {}", e),
        })
    }
}
