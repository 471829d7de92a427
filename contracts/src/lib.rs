//! # PROJECT CONTRACTS LIBRARY
//!
//! **SHARED CONTRACTS BETWEEN ROUTER AND APPLICATION CODE**
//!
//! **ARCHITECTURE**: Value objects plus a trait-based query codec
//! **GUARANTEE**: Every decode failure names the offending field
//! **SCOPE**: No network, filesystem or routing logic lives here
//!
//! The load-bearing piece is the `query` module: a bidirectional mapping
//! between typed records and URL query strings, covering scalars of every
//! width, optionals, arrays, nested JSON values, dates under pluggable
//! strategies, and the comparison/range/ordering/pagination filter types.
//! The rest are the simple value contracts route handlers exchange:
//! HTTP-status request errors, identifiers, and handler closure shapes.

pub mod api;
pub mod errors;
pub mod handlers;
pub mod identifier;
pub mod query;
