//! # CONCRETE VALIDATOR IMPLEMENTATIONS
//!
//! **CRITICAL**: Built-in field validators implementing the core `Validator` trait.
//! **MANDATE**: Rejections carry only the short field-level message; the record
//! validator attaches the field name.

use super::Validator;
use crate::errors::HandlerError;
use regex::Regex;
use serde_json::{Number, Value as JsonValue};
use std::ops::RangeInclusive;

/// Message of every `StringValidator` rejection.
pub const INVALID_STRING: &str = "Invalid string";

/// Message of every `NumberValidator` rejection.
pub const INVALID_NUMBER: &str = "Invalid number";

/// Largest magnitude an `f64` holds without losing integer precision (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// ================================================================================================
// STRING VALIDATOR - Full-string pattern match
// ================================================================================================

/// **STRING VALIDATOR**
///
/// **PURPOSE**: Accepts JSON strings whose entire text matches a pattern.
/// **GUARANTEE**: The pattern is anchored at construction, so substring hits never pass.
#[derive(Debug, Clone)]
pub struct StringValidator {
    /// **ANCHORED PATTERN** - `^(?:pattern)$`
    pattern: Regex,
}

/// Build a string validator from a regex pattern.
pub fn create_string_validator(pattern: &str) -> Result<StringValidator, HandlerError> {
    StringValidator::new(pattern)
}

impl StringValidator {
    /// **CONSTRUCTOR**
    ///
    /// **PARAMETERS**:
    /// - `pattern: &str` - Regex the whole input must match; existing `^`/`$` anchors are harmless
    ///
    /// **RETURNS**: `InvalidPattern` when the pattern does not compile
    pub fn new(pattern: &str) -> Result<Self, HandlerError> {
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| HandlerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { pattern: compiled })
    }

    /// **CONSTRUCTOR FROM COMPILED REGEX**
    ///
    /// Recompiles the source text anchored; leftmost-first search on the
    /// unanchored regex could miss a full-length alternative.
    pub fn from_regex(regex: &Regex) -> Result<Self, HandlerError> {
        Self::new(regex.as_str())
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Validator for StringValidator {
    type Input = JsonValue;
    type Output = String;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError> {
        match input {
            JsonValue::String(text) if self.matches(&text) => Ok(text),
            _ => Err(HandlerError::invalid(INVALID_STRING)),
        }
    }
}

// ================================================================================================
// NUMERIC RANGE VALIDATOR - Inclusive bounds check
// ================================================================================================

/// **NUMERIC RANGE VALIDATOR**
///
/// **PURPOSE**: Validates numeric values against an inclusive range.
/// **GUARANTEE**: NaN never passes (`RangeInclusive::contains` is false for NaN).
#[derive(Debug, Clone)]
pub struct NumericRangeValidator<T> {
    /// **VALID RANGE** - Inclusive range of acceptable values
    range: RangeInclusive<T>,
}

impl<T: PartialOrd + Copy> NumericRangeValidator<T> {
    pub fn new(range: RangeInclusive<T>) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &RangeInclusive<T> {
        &self.range
    }
}

impl NumericRangeValidator<f64> {
    pub fn f64_range(min: f64, max: f64) -> NumericRangeValidator<f64> {
        NumericRangeValidator::new(min..=max)
    }
}

impl<T: PartialOrd + Copy> Validator for NumericRangeValidator<T> {
    type Input = T;
    type Output = T;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError> {
        if self.range.contains(&input) {
            Ok(input)
        } else {
            Err(HandlerError::invalid(INVALID_NUMBER))
        }
    }
}

// ================================================================================================
// NUMBER VALIDATOR - Numeric or integer-string input within [min, max]
// ================================================================================================

/// **NUMBER VALIDATOR**
///
/// **PURPOSE**: Accepts JSON numbers as-is and strings through `parse_int`,
/// then bounds-checks the candidate.
/// **GUARANTEE**: Integer-valued candidates stay integer `Number`s, so a
/// validated record validates to itself again.
#[derive(Debug, Clone)]
pub struct NumberValidator {
    range: NumericRangeValidator<f64>,
}

/// Build a number validator accepting `min..=max`.
pub fn create_number_validator(min: f64, max: f64) -> NumberValidator {
    NumberValidator::new(min, max)
}

impl NumberValidator {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            range: NumericRangeValidator::f64_range(min, max),
        }
    }

    fn candidate(input: JsonValue) -> Option<Number> {
        match input {
            JsonValue::Number(number) => Some(number),
            JsonValue::String(text) => parse_int(&text),
            _ => None,
        }
    }
}

impl Validator for NumberValidator {
    type Input = JsonValue;
    type Output = Number;

    fn validate(&self, input: Self::Input) -> Result<Self::Output, HandlerError> {
        let number = Self::candidate(input).ok_or_else(|| HandlerError::invalid(INVALID_NUMBER))?;
        let value = number
            .as_f64()
            .ok_or_else(|| HandlerError::invalid(INVALID_NUMBER))?;

        self.range.validate(value)?;
        Ok(number)
    }
}

/// **LEADING-DIGIT INTEGER PARSE**
///
/// Skips leading whitespace, takes an optional sign, an optional `0x`/`0X`
/// prefix (radix 16), then the longest run of digits. Anything after the
/// digits is ignored. Returns `None` when no digit is found, or when the
/// digits overflow to infinity (no JSON number can carry it).
///
/// ```rust
/// use schema_handler::validation::parse_int;
///
/// assert_eq!(parse_int("42abc").and_then(|n| n.as_i64()), Some(42));
/// assert_eq!(parse_int(" -0x1A").and_then(|n| n.as_i64()), Some(-26));
/// assert!(parse_int("abc").is_none());
/// ```
pub fn parse_int(text: &str) -> Option<Number> {
    let mut rest = text.trim_start_matches(is_leading_space);

    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let radix = match rest.get(..2) {
        Some("0x") | Some("0X") => {
            rest = &rest[2..];
            16
        }
        _ => 10,
    };

    let digits: Vec<u32> = rest.chars().map_while(|c| c.to_digit(radix)).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .iter()
        .fold(0f64, |acc, digit| acc * f64::from(radix) + f64::from(*digit));
    let value = if negative { -magnitude } else { magnitude };

    if magnitude <= MAX_SAFE_INTEGER {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// JavaScript `trim` whitespace: Unicode `White_Space` plus the byte-order
/// mark U+FEFF, but not NEL (U+0085).
fn is_leading_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

// ================================================================================================
// UNIT TESTS
// ================================================================================================
