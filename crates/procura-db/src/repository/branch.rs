//! # Branch Repository
//!
//! Identity resolution and branch/company provisioning.
//!
//! The storefront never sees raw credentials; the authentication
//! collaborator hands it an opaque principal id, and `find_by_auth_user`
//! turns that into the branch (and therefore the company scope) every
//! other operation keys on. An unlinked principal is a normal condition,
//! not an error: reads degrade to anonymous, writes refuse.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use procura_core::Branch;

/// Branch payload for provisioning (seed and registration surfaces).
#[derive(Debug, Clone)]
pub struct NewBranch {
    pub company_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub login_id: String,
    pub email: String,
    /// Principal id at the external identity provider.
    pub auth_user_id: String,
}

#[derive(Debug, sqlx::FromRow)]
struct BranchRow {
    id: String,
    company_id: String,
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
}

impl BranchRow {
    fn into_branch(self) -> Branch {
        Branch {
            id: self.id,
            company_id: self.company_id,
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
        }
    }
}

/// Repository for branch database operations.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: SqlitePool,
}

impl BranchRepository {
    /// Creates a new BranchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BranchRepository { pool }
    }

    /// Resolves an authentication principal to its branch.
    ///
    /// `Ok(None)` means the principal has no branch link - the caller
    /// decides whether that degrades to anonymous (reads) or refuses
    /// (order submission).
    pub async fn find_by_auth_user(&self, auth_user_id: &str) -> DbResult<Option<Branch>> {
        debug!(auth_user_id, "Resolving branch for principal");

        let row: Option<BranchRow> = sqlx::query_as(
            "SELECT id, company_id, name, address, phone \
             FROM branches WHERE auth_user_id = ?1",
        )
        .bind(auth_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BranchRow::into_branch))
    }

    /// Gets a branch by id.
    pub async fn get_by_id(&self, branch_id: &str) -> DbResult<Option<Branch>> {
        let row: Option<BranchRow> = sqlx::query_as(
            "SELECT id, company_id, name, address, phone FROM branches WHERE id = ?1",
        )
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BranchRow::into_branch))
    }

    /// Inserts a company and returns its generated id.
    pub async fn insert_company(&self, name: &str) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(company = name, "Inserting company");

        sqlx::query("INSERT INTO companies (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(name)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Inserts a branch linked to its authentication principal and returns
    /// its generated id. The `auth_user_id` UNIQUE constraint keeps one
    /// principal from owning two branches.
    pub async fn insert_branch(&self, branch: &NewBranch) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(company = %branch.company_id, name = %branch.name, "Inserting branch");

        sqlx::query(
            "INSERT INTO branches ( \
                id, company_id, name, address, phone, login_id, email, auth_user_id, created_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&id)
        .bind(&branch.company_id)
        .bind(&branch.name)
        .bind(&branch.address)
        .bind(&branch.phone)
        .bind(&branch.login_id)
        .bind(&branch.email)
        .bind(&branch.auth_user_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn new_branch(company_id: &str, auth_user_id: &str) -> NewBranch {
        NewBranch {
            company_id: company_id.to_string(),
            name: "Shinjuku Branch".to_string(),
            address: "Tokyo".to_string(),
            phone: "03-0000-0000".to_string(),
            login_id: format!("login-{auth_user_id}"),
            email: format!("{auth_user_id}@example.com"),
            auth_user_id: auth_user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_auth_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branches = db.branches();

        let company_id = branches.insert_company("Acme").await.unwrap();
        let branch_id = branches
            .insert_branch(&new_branch(&company_id, "principal-1"))
            .await
            .unwrap();

        let found = branches.find_by_auth_user("principal-1").await.unwrap().unwrap();
        assert_eq!(found.id, branch_id);
        assert_eq!(found.company_id, company_id);
        assert_eq!(found.name, "Shinjuku Branch");

        // unlinked principal is Ok(None), never an error
        assert!(branches.find_by_auth_user("stranger").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_principal_one_branch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let branches = db.branches();

        let company_id = branches.insert_company("Acme").await.unwrap();
        branches
            .insert_branch(&new_branch(&company_id, "principal-1"))
            .await
            .unwrap();

        let mut second = new_branch(&company_id, "principal-1");
        second.login_id = "different-login".to_string();
        let result = branches.insert_branch(&second).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }
}
