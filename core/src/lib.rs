//! # SCHEMA HANDLER CORE LIBRARY
//!
//! **DECLARATIVE REQUEST HANDLERS FROM A SCHEMA AND A BUSINESS FUNCTION**
//!
//! **ARCHITECTURE**: Trait-based field validators composed into flat record schemas
//! **GUARANTEE**: Every request resolves to exactly one 200 / 400 / 500 envelope
//! **TRANSPORT**: Agnostic; the platform supplies method, query and body, and
//! receives status, headers and body back

pub mod api;
pub mod errors;
pub mod handler;
pub mod request;
pub mod response;
pub mod trace;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;
