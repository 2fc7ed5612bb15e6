//! Role names granted to administrator accounts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RoleName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleNameError {
    /// The name is empty.
    #[error("role name cannot be empty")]
    Empty,
    /// The name contains characters other than lowercase letters, digits and `_`.
    #[error("role name may only contain a-z, 0-9 and '_', got {0:?}")]
    InvalidCharacters(String),
}

/// The name of a role record, e.g. `admin`.
///
/// Role names are the lookup key for role records, so they are restricted
/// to a lowercase identifier alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Name of the role that grants access to the admin backend.
    pub const ADMIN: &'static str = "admin";

    /// The `admin` role.
    #[must_use]
    pub fn admin() -> Self {
        Self(Self::ADMIN.to_owned())
    }

    /// Parse a role name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or uses characters outside `[a-z0-9_]`.
    pub fn parse(s: &str) -> Result<Self, RoleNameError> {
        if s.is_empty() {
            return Err(RoleNameError::Empty);
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        {
            return Err(RoleNameError::InvalidCharacters(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the role name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoleName {
    type Error = RoleNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoleName> for String {
    fn from(role: RoleName) -> Self {
        role.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for RoleName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for RoleName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for RoleName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
