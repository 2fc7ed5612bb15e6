//! Domain models for the records the bootstrap layer owns or populates.

pub mod admin_user;
pub mod session;
pub mod store;

pub use admin_user::{AdminUser, Role};
pub use session::{CurrentAdmin, keys as session_keys};
pub use store::Store;
