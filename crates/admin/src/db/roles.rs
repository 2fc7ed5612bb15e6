//! Role and role-grant repository.

use sqlx::PgPool;

use storekeep_core::{AdminUserId, RoleId, RoleName};

use super::{RepositoryError, conflict_on_unique};
use crate::models::Role;

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: RoleName,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::new(row.id),
            name: row.name,
        }
    }
}

/// Repository for roles and their grants to admin users.
pub struct RoleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a role by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &RoleName) -> Result<Option<Role>, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name FROM storekeep.role WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the role already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &RoleName) -> Result<Role, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO storekeep.role (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "role"))?;

        Ok(row.into())
    }

    /// List the roles granted to an admin user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_admin(
        &self,
        admin_id: AdminUserId,
    ) -> Result<Vec<Role>, RepositoryError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r"
            SELECT DISTINCT r.id, r.name
            FROM storekeep.role r
            JOIN storekeep.admin_user_role ur ON ur.role_id = r.id
            WHERE ur.admin_user_id = $1
            ORDER BY r.id
            ",
        )
        .bind(admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a grant row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (e.g. unknown admin or role).
    pub async fn grant(&self, admin_id: AdminUserId, role_id: RoleId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO storekeep.admin_user_role (admin_user_id, role_id) VALUES ($1, $2)")
            .bind(admin_id)
            .bind(role_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
