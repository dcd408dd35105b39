//! Business logic services.
//!
//! - `auth` - Registration, login, password hashing, bearer tokens

pub mod auth;
