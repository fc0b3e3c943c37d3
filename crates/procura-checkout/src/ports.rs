//! # Storage, Identity, and Notification Ports
//!
//! The narrow async interfaces the checkout flows are written against,
//! plus their SQLite implementations over [`procura_db::Database`].
//!
//! ## Why Ports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Narrow Ports, Explicit Saga                           │
//! │                                                                         │
//! │  The storage collaborator offers row-level CRUD with single-statement  │
//! │  atomicity only. The write port therefore exposes exactly four         │
//! │  operations:                                                            │
//! │                                                                         │
//! │     insert_order_header   insert_order_items                           │
//! │     insert_document       delete_order                                 │
//! │                                                                         │
//! │  No transaction handle, no savepoints. Whatever consistency the        │
//! │  pipeline needs, it builds from these four calls - which is exactly    │
//! │  what the compensation sequence in submit.rs does.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tests substitute in-memory fakes for these traits; the pipeline cannot
//! tell the difference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NotifyError;
use procura_core::{
    Branch, DocumentKind, DocumentStatus, Money, Order, PaymentMethod,
};
use procura_db::{Database, DbResult, NewOrderItem, OrderItemDetail};

// =============================================================================
// Join-Shape Normalization
// =============================================================================

/// A joined relation as the storage read layer returns it: a single object
/// when the backend infers to-one cardinality, a (usually single-element)
/// array when it infers to-many. Callers normalize through [`first`]
/// before any projection logic runs.
///
/// [`first`]: OneOrMany::first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// The canonical element: the object itself, or the array's head.
    /// An empty array yields `None` (orphaned join).
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.first(),
        }
    }

    /// Consuming variant of [`first`](OneOrMany::first).
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.into_iter().next(),
        }
    }
}

/// The owning order's fields as embedded in a document join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRef {
    pub order_number: String,
    pub total_amount: i64,
}

/// A document row with its order join still in wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentJoinRow {
    pub id: String,
    pub order_id: String,
    pub kind: DocumentKind,
    pub document_number: String,
    pub url: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    /// Object or single-element array, backend's choice.
    pub order: OneOrMany<OrderRef>,
}

// =============================================================================
// Ports
// =============================================================================

/// Resolves the opaque principal id from the authentication collaborator
/// to a branch.
#[async_trait]
pub trait BranchDirectory: Send + Sync {
    /// `Ok(None)` means the principal has no branch link - a normal
    /// condition, not an error.
    async fn branch_for_principal(&self, auth_user_id: &str) -> DbResult<Option<Branch>>;
}

/// The write side of order persistence. Each call is one statement;
/// `delete_order` is the compensating action for all three inserts.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order_header(
        &self,
        order_number: &str,
        branch_id: &str,
        total_amount: Money,
        tax_amount: Money,
    ) -> DbResult<String>;

    async fn insert_order_items(&self, order_id: &str, items: &[NewOrderItem]) -> DbResult<()>;

    async fn insert_document(
        &self,
        order_id: &str,
        kind: DocumentKind,
        document_number: &str,
        url: &str,
        status: DocumentStatus,
    ) -> DbResult<String>;

    async fn delete_order(&self, order_id: &str) -> DbResult<()>;
}

/// The read side: order history and documents for a branch.
#[async_trait]
pub trait OrderReader: Send + Sync {
    async fn orders_for_branch(&self, branch_id: &str) -> DbResult<Vec<Order>>;

    async fn items_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<OrderItemDetail>>;

    async fn documents_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<DocumentJoinRow>>;
}

/// A submitted-order notification, as handed to the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct OrderNotice {
    pub order_number: String,
    /// Tax-inclusive order total (the persisted header amount).
    pub amount: Money,
    pub item_count: usize,
    pub payment_method: PaymentMethod,
    pub delivery_notes: String,
}

/// Delivers submitted-order notifications. Fire-and-forget from the
/// pipeline's point of view: failures are logged, never propagated.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_submitted(&self, notice: &OrderNotice) -> Result<(), NotifyError>;
}

/// Notifier that writes the notice to the log and calls it delivered.
/// The default wiring until a mail/webhook consumer exists.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl OrderNotifier for LoggingNotifier {
    async fn order_submitted(&self, notice: &OrderNotice) -> Result<(), NotifyError> {
        info!(
            order_number = %notice.order_number,
            amount = %notice.amount,
            item_count = notice.item_count,
            payment_method = notice.payment_method.as_str(),
            "Order submitted"
        );
        Ok(())
    }
}

// =============================================================================
// SQLite Implementations
// =============================================================================

#[async_trait]
impl BranchDirectory for Database {
    async fn branch_for_principal(&self, auth_user_id: &str) -> DbResult<Option<Branch>> {
        self.branches().find_by_auth_user(auth_user_id).await
    }
}

#[async_trait]
impl OrderStore for Database {
    async fn insert_order_header(
        &self,
        order_number: &str,
        branch_id: &str,
        total_amount: Money,
        tax_amount: Money,
    ) -> DbResult<String> {
        self.orders()
            .insert_header(order_number, branch_id, total_amount, tax_amount)
            .await
    }

    async fn insert_order_items(&self, order_id: &str, items: &[NewOrderItem]) -> DbResult<()> {
        self.orders().insert_items(order_id, items).await
    }

    async fn insert_document(
        &self,
        order_id: &str,
        kind: DocumentKind,
        document_number: &str,
        url: &str,
        status: DocumentStatus,
    ) -> DbResult<String> {
        self.documents()
            .insert(order_id, kind, document_number, url, status)
            .await
    }

    async fn delete_order(&self, order_id: &str) -> DbResult<()> {
        self.orders().delete_order(order_id).await
    }
}

#[async_trait]
impl OrderReader for Database {
    async fn orders_for_branch(&self, branch_id: &str) -> DbResult<Vec<Order>> {
        self.orders().list_for_branch(branch_id).await
    }

    async fn items_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<OrderItemDetail>> {
        self.orders().items_for_orders(order_ids).await
    }

    async fn documents_for_orders(&self, order_ids: &[&str]) -> DbResult<Vec<DocumentJoinRow>> {
        let details = self.documents().list_for_orders(order_ids).await?;
        // the SQL join always has to-one cardinality; the wire shape's
        // array case comes from other backends
        Ok(details
            .into_iter()
            .map(|d| DocumentJoinRow {
                id: d.id,
                order_id: d.order_id,
                kind: d.kind,
                document_number: d.document_number,
                url: d.url,
                status: d.status,
                created_at: d.created_at,
                order: OneOrMany::One(OrderRef {
                    order_number: d.order_number,
                    total_amount: d.order_total.amount(),
                }),
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

    #[test]
    fn test_one_or_many_deserializes_both_shapes() {
        let object: OneOrMany<OrderRef> =
            serde_json::from_str(r#"{"order_number":"ORD-X","total_amount":100}"#).unwrap();
        assert_eq!(object.first().unwrap().order_number, "ORD-X");

        let array: OneOrMany<OrderRef> =
            serde_json::from_str(r#"[{"order_number":"ORD-Y","total_amount":200}]"#).unwrap();
        assert_eq!(array.first().unwrap().order_number, "ORD-Y");

        let empty: OneOrMany<OrderRef> = serde_json::from_str("[]").unwrap();
        assert!(empty.first().is_none());
    }
}
