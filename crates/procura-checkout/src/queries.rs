//! # Order and Document Queries
//!
//! Read-side projections for the order history and documents screens.
//!
//! ## Read-Boundary Rules
//! - Unresolved identity degrades to an empty result, never an error:
//!   a logged-out user sees an empty history, not a failure page.
//! - The stored status vocabulary (legacy rows included) is normalized
//!   here and only here.
//! - The document→order join arrives in wire shape ([`OneOrMany`]) and is
//!   normalized before any projection math runs.
//! - `subtotal` is derived from line items (`Σ unit_price × qty`) and
//!   `tax = total − subtotal`, clamped at zero: historical rows with odd
//!   totals must never render a negative tax.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::CheckoutResult;
use crate::ports::{BranchDirectory, OneOrMany, OrderReader};
use procura_core::{DocumentKind, DocumentStatus, Money, OrderStatus};

/// One line of an order as the history screen renders it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

/// An order as the history screen renders it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_number: String,
    /// `YYYY-MM-DD`.
    pub order_date: String,
    pub status: OrderStatus,
    pub items: Vec<OrderLineView>,
    /// Derived from items, not read from the header.
    pub subtotal: Money,
    /// `total - subtotal`, clamped at zero.
    pub tax: Money,
    /// The persisted header total (subtotal + tax, no shipping).
    pub total: Money,
    /// Fetchable document URLs keyed by kind. Absent kinds have not been
    /// issued (or are still pending).
    pub document_urls: HashMap<DocumentKind, String>,
}

/// A document row as the documents screen renders it.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub kind: DocumentKind,
    pub document_number: String,
    pub order_number: String,
    /// `YYYY-MM-DD`.
    pub issue_date: String,
    /// The owning order's tax-inclusive total.
    pub amount: Money,
    pub status: DocumentStatus,
    pub file_url: String,
}

/// Read-side query service over the directory and reader ports.
pub struct OrderQueries<D, R> {
    directory: D,
    reader: R,
}

impl<D, R> OrderQueries<D, R>
where
    D: BranchDirectory,
    R: OrderReader,
{
    pub fn new(directory: D, reader: R) -> Self {
        OrderQueries { directory, reader }
    }

    /// Lists the identity's order history, newest first, with items and
    /// per-kind document URLs attached.
    pub async fn list_orders(&self, identity: Option<&str>) -> CheckoutResult<Vec<OrderView>> {
        let Some(branch) = self.resolve(identity).await? else {
            return Ok(Vec::new());
        };

        let orders = self.reader.orders_for_branch(&branch.id).await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        let items = self.reader.items_for_orders(&ids).await?;
        let documents = self.reader.documents_for_orders(&ids).await?;

        // group children by owning order
        let mut items_by_order: HashMap<String, Vec<OrderLineView>> = HashMap::new();
        for item in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderLineView {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                });
        }

        let mut urls_by_order: HashMap<String, HashMap<DocumentKind, String>> = HashMap::new();
        for doc in documents {
            // pending documents have no fetchable file yet
            if doc.status == DocumentStatus::Pending {
                continue;
            }
            urls_by_order
                .entry(doc.order_id)
                .or_default()
                .entry(doc.kind)
                .or_insert(doc.url);
        }

        let views = orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                let subtotal: Money = items
                    .iter()
                    .map(|i| i.unit_price.multiply_quantity(i.quantity))
                    .sum();
                let tax = if order.total_amount >= subtotal {
                    order.total_amount - subtotal
                } else {
                    Money::zero()
                };

                OrderView {
                    order_number: order.order_number,
                    order_date: order.created_at.format("%Y-%m-%d").to_string(),
                    status: order.status,
                    items,
                    subtotal,
                    tax,
                    total: order.total_amount,
                    document_urls: urls_by_order.remove(&order.id).unwrap_or_default(),
                }
            })
            .collect();

        Ok(views)
    }

    /// Lists the identity's documents, newest first, each enriched with
    /// its owning order's number and total.
    ///
    /// Rows whose order join normalizes to nothing (orphaned documents)
    /// are dropped.
    pub async fn list_documents(
        &self,
        identity: Option<&str>,
    ) -> CheckoutResult<Vec<DocumentView>> {
        let Some(branch) = self.resolve(identity).await? else {
            return Ok(Vec::new());
        };

        let orders = self.reader.orders_for_branch(&branch.id).await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        let rows = self.reader.documents_for_orders(&ids).await?;

        let views = rows
            .into_iter()
            .filter_map(|row| {
                let issue_date = row.created_at.format("%Y-%m-%d").to_string();
                let order = normalize_order_join(row.order)?;
                Some(DocumentView {
                    kind: row.kind,
                    document_number: row.document_number,
                    order_number: order.order_number,
                    issue_date,
                    amount: Money::new(order.total_amount),
                    status: row.status,
                    file_url: row.url,
                })
            })
            .collect();

        Ok(views)
    }

    /// Identity resolution for reads: `None` and unlinked principals both
    /// degrade to "no branch" rather than an error.
    async fn resolve(
        &self,
        identity: Option<&str>,
    ) -> CheckoutResult<Option<procura_core::Branch>> {
        let Some(principal) = identity else {
            debug!("Read with no identity, returning empty result");
            return Ok(None);
        };
        Ok(self.directory.branch_for_principal(principal).await?)
    }
}

/// Collapses the wire-shaped order join to its canonical element.
fn normalize_order_join(join: OneOrMany<crate::ports::OrderRef>) -> Option<crate::ports::OrderRef> {
    join.into_first()
}

// =============================================================================
// Unit Tests
// =============================================================================
