//! Core types for Storekeep.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod email;
pub mod id;
pub mod role;

pub use currency::{CurrencyCode, CurrencyError};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{RoleName, RoleNameError};
