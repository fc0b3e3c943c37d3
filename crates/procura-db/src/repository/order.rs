//! # Order Repository
//!
//! Database operations for order headers and line items.
//!
//! ## Persistence Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Order, Three Statements                          │
//! │                                                                         │
//! │  1. insert_header()  → orders row  (status "ordered")                  │
//! │  2. insert_items()   → one multi-row INSERT into order_items           │
//! │  3. (documents)      → DocumentRepository::insert()                    │
//! │                                                                         │
//! │  The backend offers no multi-statement transaction, so each call is    │
//! │  atomic on its own and the submission pipeline compensates with        │
//! │  delete_order() when a later step fails.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads normalize the stored status vocabulary (legacy `ordered` /
//! `canceled` rows included) through [`OrderStatus::normalize`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use procura_core::{Money, Order, OrderStatus, INITIAL_ORDER_STATUS};

/// Line item payload for [`OrderRepository::insert_items`]. Carries the
/// snapshot price taken at submission time.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

/// A stored line item joined with its product's display name, for order
/// history rendering. `product_name` falls back to the product id when the
/// catalog row has been deleted since submission.
#[derive(Debug, Clone)]
pub struct OrderItemDetail {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: Option<String>,
    branch_id: String,
    status: Option<String>,
    total_amount: Option<i64>,
    tax_amount: Option<i64>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            order_number: self
                .order_number
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| self.id.clone()),
            id: self.id,
            branch_id: self.branch_id,
            status: OrderStatus::normalize(self.status.as_deref().unwrap_or("")),
            total_amount: Money::new(self.total_amount.unwrap_or(0)),
            tax_amount: Money::new(self.tax_amount.unwrap_or(0)),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemDetailRow {
    order_id: String,
    product_id: String,
    product_name: Option<String>,
    quantity: Option<i64>,
    unit_price: Option<i64>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts an order header and returns its generated id.
    ///
    /// The status is always [`INITIAL_ORDER_STATUS`]; `total_amount` is
    /// subtotal + tax (shipping is a presentation-time addition and is
    /// never persisted).
    pub async fn insert_header(
        &self,
        order_number: &str,
        branch_id: &str,
        total_amount: Money,
        tax_amount: Money,
    ) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        debug!(order = order_number, branch = branch_id, "Inserting order header");

        sqlx::query(
            "INSERT INTO orders ( \
                id, order_number, branch_id, status, total_amount, tax_amount, created_at \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&id)
        .bind(order_number)
        .bind(branch_id)
        .bind(INITIAL_ORDER_STATUS)
        .bind(total_amount.amount())
        .bind(tax_amount.amount())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Inserts all line items for an order as one multi-row statement, so
    /// the item set lands atomically even without a transaction.
    pub async fn insert_items(&self, order_id: &str, items: &[NewOrderItem]) -> DbResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        debug!(order_id, count = items.len(), "Inserting order items");

        let mut sql =
            String::from("INSERT INTO order_items (id, order_id, product_id, quantity, unit_price) VALUES ");
        let placeholders: Vec<String> = (0..items.len())
            .map(|i| {
                let base = i * 5;
                format!(
                    "(?{}, ?{}, ?{}, ?{}, ?{})",
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5
                )
            })
            .collect();
        sql.push_str(&placeholders.join(", "));

        let mut query = sqlx::query(&sql);
        for item in items {
            query = query
                .bind(Uuid::new_v4().to_string())
                .bind(order_id)
                .bind(&item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price.amount());
        }
        query.execute(&self.pool).await?;

        Ok(())
    }

    /// Removes an order and everything attached to it: items, documents,
    /// then the header, as three separate statements in child-first order.
    ///
    /// This is the compensation path for a failed submission; it succeeds
    /// even when some of the child sets were never written.
    pub async fn delete_order(&self, order_id: &str) -> DbResult<()> {
        info!(order_id, "Deleting order");

        sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM documents WHERE order_id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an order header by id.
    pub async fn get_by_id(&self, order_id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, order_number, branch_id, status, total_amount, tax_amount, created_at \
             FROM orders WHERE id = ?1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrderRow::into_order))
    }

    /// Lists a branch's orders, newest first.
    pub async fn list_for_branch(&self, branch_id: &str) -> DbResult<Vec<Order>> {
        debug!(branch_id, "Listing orders");

        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, order_number, branch_id, status, total_amount, tax_amount, created_at \
             FROM orders WHERE branch_id = ?1 ORDER BY created_at DESC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    /// Fetches the line items for a set of orders in one query, each joined
    /// with its product's current display name.
    pub async fn items_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<OrderItemDetail>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (0..order_ids.len()).map(|i| format!("?{}", i + 1)).collect();
        let sql = format!(
            "SELECT oi.order_id, oi.product_id, p.name AS product_name, \
                    oi.quantity, oi.unit_price \
             FROM order_items oi \
             LEFT JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id IN ({})",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, ItemDetailRow>(&sql);
        for id in order_ids {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderItemDetail {
                order_id: row.order_id,
                product_name: row
                    .product_name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| row.product_id.clone()),
                product_id: row.product_id,
                quantity: row.quantity.unwrap_or(0),
                unit_price: Money::new(row.unit_price.unwrap_or(0)),
            })
            .collect())
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
    use procura_core::{DocumentKind, DocumentStatus};

    /// In-memory database with one company + branch provisioned.
    async fn test_db_with_branch() -> (Database, String) {
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
        (db, branch_id)
    }

    #[tokio::test]
    async fn test_header_reads_back_as_pending() {
        let (db, branch_id) = test_db_with_branch().await;
        let orders = db.orders();

        orders
            .insert_header("ORD-20250101-120000", &branch_id, Money::new(10870), Money::new(980))
            .await
            .unwrap();

        let listed = orders.list_for_branch(&branch_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].order_number, "ORD-20250101-120000");
        // stored as "ordered", normalized at the read boundary
        assert_eq!(listed[0].status, OrderStatus::Pending);
        assert_eq!(listed[0].total_amount, Money::new(10870));
        assert_eq!(listed[0].tax_amount, Money::new(980));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (db, branch_id) = test_db_with_branch().await;
        let orders = db.orders();

        let first = orders
            .insert_header("ORD-A", &branch_id, Money::new(100), Money::new(10))
            .await
            .unwrap();
        // force distinct timestamps
        sqlx::query("UPDATE orders SET created_at = '2025-01-01T00:00:00+00:00' WHERE id = ?1")
            .bind(&first)
            .execute(db.pool())
            .await
            .unwrap();
        orders
            .insert_header("ORD-B", &branch_id, Money::new(200), Money::new(20))
            .await
            .unwrap();

        let listed = orders.list_for_branch(&branch_id).await.unwrap();
        assert_eq!(listed[0].order_number, "ORD-B");
        assert_eq!(listed[1].order_number, "ORD-A");
    }

    #[tokio::test]
    async fn test_items_join_product_names() {
        let (db, branch_id) = test_db_with_branch().await;
        let orders = db.orders();

        let paper = procura_core::Product {
            id: "prod-paper".to_string(),
            sku: "CPP-A4-250".to_string(),
            name: "Copy Paper".to_string(),
            description: String::new(),
            base_price: Money::new(349),
            tax_rate_bps: 1000,
            category_id: "office-supplies".to_string(),
            brand: String::new(),
            stock: procura_core::StockState::InStock,
            images: vec![],
            is_active: true,
        };
        db.catalog().insert(&paper).await.unwrap();

        let order_id = orders
            .insert_header("ORD-C", &branch_id, Money::new(3839), Money::new(340))
            .await
            .unwrap();
        orders
            .insert_items(
                &order_id,
                &[
                    NewOrderItem {
                        product_id: "prod-paper".to_string(),
                        quantity: 10,
                        unit_price: Money::new(349),
                    },
                    NewOrderItem {
                        product_id: "prod-vanished".to_string(),
                        quantity: 1,
                        unit_price: Money::new(100),
                    },
                ],
            )
            .await
            .unwrap();

        let mut items = orders.items_for_orders(&[&order_id]).await.unwrap();
        items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "Copy Paper");
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[0].unit_price, Money::new(349));
        // deleted-product fallback: the id stands in for the name
        assert_eq!(items[1].product_name, "prod-vanished");
    }

    #[tokio::test]
    async fn test_delete_order_removes_children_first() {
        let (db, branch_id) = test_db_with_branch().await;
        let orders = db.orders();

        let order_id = orders
            .insert_header("ORD-D", &branch_id, Money::new(349), Money::new(34))
            .await
            .unwrap();
        orders
            .insert_items(
                &order_id,
                &[NewOrderItem {
                    product_id: "prod-x".to_string(),
                    quantity: 1,
                    unit_price: Money::new(349),
                }],
            )
            .await
            .unwrap();
        db.documents()
            .insert(&order_id, DocumentKind::Po, "PO-D", "url", DocumentStatus::Pending)
            .await
            .unwrap();

        orders.delete_order(&order_id).await.unwrap();

        assert!(orders.get_by_id(&order_id).await.unwrap().is_none());
        assert!(orders.items_for_orders(&[&order_id]).await.unwrap().is_empty());
        assert!(db.documents().list_for_orders(&[&order_id]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_order_tolerates_missing_children() {
        let (db, branch_id) = test_db_with_branch().await;
        let orders = db.orders();

        // header only, no items or documents ever written
        let order_id = orders
            .insert_header("ORD-E", &branch_id, Money::new(100), Money::new(10))
            .await
            .unwrap();

        orders.delete_order(&order_id).await.unwrap();
        assert!(orders.get_by_id(&order_id).await.unwrap().is_none());
    }
}
