//! # Document Repository
//!
//! Storage for the PO/DN/invoice rows attached to orders. Only the PO is
//! written through this crate (at submission time); delivery notes and
//! invoices arrive later through the fulfillment back-office and are
//! read-only here.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use procura_core::{DocumentKind, DocumentStatus, Money};

/// A document row joined with its order's number and total, as the
/// documents screen renders it.
#[derive(Debug, Clone)]
pub struct DocumentDetail {
    pub id: String,
    pub order_id: String,
    pub order_number: String,
    pub order_total: Money,
    pub kind: DocumentKind,
    pub document_number: String,
    pub url: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    order_id: String,
    order_number: Option<String>,
    order_total: Option<i64>,
    doc_type: String,
    document_number: Option<String>,
    url: Option<String>,
    status: Option<String>,
    created_at: DateTime<Utc>,
}

/// Repository for document database operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Inserts a document row and returns its generated id.
    pub async fn insert(
        &self,
        order_id: &str,
        kind: DocumentKind,
        document_number: &str,
        url: &str,
        status: DocumentStatus,
    ) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(order_id, kind = kind.as_str(), number = document_number, "Inserting document");

        sqlx::query(
            "INSERT INTO documents (id, order_id, type, document_number, url, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&id)
        .bind(order_id)
        .bind(kind.as_str())
        .bind(document_number)
        .bind(url)
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Fetches the documents attached to a set of orders in one query,
    /// newest first, each joined with its order's number and total.
    ///
    /// Rows with an unrecognized `type` are dropped rather than surfaced as
    /// errors; old data must never break the documents screen.
    pub async fn list_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<DocumentDetail>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (0..order_ids.len()).map(|i| format!("?{}", i + 1)).collect();
        let sql = format!(
            "SELECT d.id, d.order_id, o.order_number, o.total_amount AS order_total, \
                    d.type AS doc_type, d.document_number, d.url, d.status, d.created_at \
             FROM documents d \
             JOIN orders o ON o.id = d.order_id \
             WHERE d.order_id IN ({}) \
             ORDER BY d.created_at DESC",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, DocumentRow>(&sql);
        for id in order_ids {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let details = rows
            .into_iter()
            .filter_map(|row| {
                let kind = DocumentKind::parse(&row.doc_type)?;
                Some(DocumentDetail {
                    id: row.id,
                    order_number: row
                        .order_number
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| row.order_id.clone()),
                    order_id: row.order_id,
                    order_total: Money::new(row.order_total.unwrap_or(0)),
                    kind,
                    document_number: row.document_number.unwrap_or_default(),
                    url: row.url.unwrap_or_default(),
                    status: DocumentStatus::parse(row.status.as_deref().unwrap_or("")),
                    created_at: row.created_at,
                })
            })
            .collect();

        Ok(details)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::branch::NewBranch;

    async fn test_db_with_order() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company_id = db.branches().insert_company("Acme").await.unwrap();
        let branch_id = db
            .branches()
            .insert_branch(&NewBranch {
                company_id,
                name: "Main".to_string(),
                address: String::new(),
                phone: String::new(),
                login_id: "acme-main".to_string(),
                email: "main@acme.example".to_string(),
                auth_user_id: "principal-1".to_string(),
            })
            .await
            .unwrap();
        let order_id = db
            .orders()
            .insert_header("ORD-20250101-120000", &branch_id, Money::new(10870), Money::new(980))
            .await
            .unwrap();
        (db, order_id)
    }

    #[tokio::test]
    async fn test_insert_and_list_joins_order_fields() {
        let (db, order_id) = test_db_with_order().await;
        let documents = db.documents();

        documents
            .insert(
                &order_id,
                DocumentKind::Po,
                "PO-20250101-120000",
                "https://placehold.co/600x800?text=PO",
                DocumentStatus::Pending,
            )
            .await
            .unwrap();

        let listed = documents.list_for_orders(&[&order_id]).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, DocumentKind::Po);
        assert_eq!(listed[0].document_number, "PO-20250101-120000");
        assert_eq!(listed[0].status, DocumentStatus::Pending);
        assert_eq!(listed[0].order_number, "ORD-20250101-120000");
        assert_eq!(listed[0].order_total, Money::new(10870));
    }

    #[tokio::test]
    async fn test_unknown_type_rows_are_dropped() {
        let (db, order_id) = test_db_with_order().await;

        sqlx::query(
            "INSERT INTO documents (id, order_id, type, created_at) \
             VALUES ('doc-x', ?1, 'receipt', '2025-01-01T00:00:00+00:00')",
        )
        .bind(&order_id)
        .execute(db.pool())
        .await
        .unwrap();

        let listed = db.documents().list_for_orders(&[&order_id]).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_order_set_short_circuits() {
        let (db, _order_id) = test_db_with_order().await;
        let listed = db.documents().list_for_orders(&[]).await.unwrap();
        assert!(listed.is_empty());
    }
}
