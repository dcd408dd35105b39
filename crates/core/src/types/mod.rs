//! Core types for Atelier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pricing;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use pricing::{SketchSize, sketch_quote};
pub use status::*;
