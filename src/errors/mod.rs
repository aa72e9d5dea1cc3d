//! Error types for the front end.
//!
//! Parsing never aborts on malformed input. Instead the parser records
//! structured diagnostics defined here:
//!
//! - Error structures with source position information
//! - One variant per failure class (unexpected token, missing prefix
//!   handler, bad integer literal, nesting limit)
//! - Names and suggestions used when rendering diagnostics

pub mod errors;
