//! Atelier Core - Shared domain types.
//!
//! This crate provides common types used across all Atelier components:
//! - `api` - Public-facing REST API
//! - `cli` - Command-line tools for seeding and administration
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP handling. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, status enums, payment methods, and the
//!   custom-sketch pricing table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
