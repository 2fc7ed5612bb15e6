//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email and password sign-in, Argon2id hashing

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService, PasswordError};
