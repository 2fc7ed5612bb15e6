//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use storekeep_core::{AdminUserId, Email};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
