//! # Order Submission Pipeline
//!
//! The compensating-sequence flow that turns a cart into persisted order
//! rows.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Submission Saga                                │
//! │                                                                         │
//! │  1. RESOLVE IDENTITY                                                   │
//! │     └── BranchDirectory::branch_for_principal → NoIdentity on miss     │
//! │                                                                         │
//! │  2. VALIDATE CART                                                      │
//! │     └── empty line set → EmptyCart                                     │
//! │                                                                         │
//! │  3. COMPUTE TOTALS                                                     │
//! │     └── procura-core pricing; total = subtotal + tax (no shipping)     │
//! │                                                                         │
//! │  4. INSERT HEADER          ──┐  forward actions; each later failure    │
//! │  5. INSERT ITEMS             │  compensates with delete_order(),       │
//! │  6. INSERT PO DOCUMENT     ──┘  which removes header + children        │
//! │                                                                         │
//! │  7. NOTIFY (fire-and-forget, failures logged and swallowed)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storage collaborator has no multi-statement transaction, so steps
//! 4-6 are three independent writes. A failure at step 5 or 6 triggers the
//! compensating delete before the error surfaces; if the delete itself
//! fails the original error still wins and the orphaned order id is
//! carried in [`CheckoutError::Persistence`] for manual cleanup.
//!
//! The pipeline never clears the caller's cart: the cart outlives a failed
//! submission so the user can retry.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::error::{CheckoutError, CheckoutResult};
use crate::ports::{BranchDirectory, OrderNotice, OrderNotifier, OrderStore};
use procura_core::{
    CartLine, DocumentKind, DocumentStatus, PaymentMethod, PricingRules,
};
use procura_db::{DbError, NewOrderItem};

/// Placeholder PO file reference written at submission time. Replaced by
/// fulfillment when the real document is generated.
pub const PO_PLACEHOLDER_URL: &str = "https://placehold.co/600x800?text=PO";

/// Formats the human-readable order number for a submission instant.
///
/// Time-derived with second precision and no collision avoidance: two
/// submissions in the same second get the same number. The row id stays
/// unique; the number is a display key.
pub fn order_number_at(instant: DateTime<Utc>) -> String {
    instant.format("ORD-%Y%m%d-%H%M%S").to_string()
}

/// Derives the PO document number from an order number
/// (`ORD-20250101-120000` → `PO-20250101-120000`).
pub fn po_number_for(order_number: &str) -> String {
    let stem = order_number.strip_prefix("ORD-").unwrap_or(order_number);
    format!("PO-{stem}")
}

/// Order submission pipeline over the three ports it needs.
pub struct CheckoutPipeline<D, S, N> {
    directory: D,
    store: S,
    notifier: N,
    rules: PricingRules,
}

impl<D, S, N> CheckoutPipeline<D, S, N>
where
    D: BranchDirectory,
    S: OrderStore,
    N: OrderNotifier,
{
    /// Creates a pipeline with the default pricing rules.
    pub fn new(directory: D, store: S, notifier: N) -> Self {
        CheckoutPipeline {
            directory,
            store,
            notifier,
            rules: PricingRules::default(),
        }
    }

    /// Overrides the pricing rules (threshold/fee/fallback rate).
    pub fn with_rules(mut self, rules: PricingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Submits an order and returns its order number.
    ///
    /// `identity` is the opaque principal id from the authentication
    /// collaborator; `None` (anonymous) and unlinked principals both
    /// refuse with [`CheckoutError::NoIdentity`].
    pub async fn submit_order(
        &self,
        identity: Option<&str>,
        lines: &[CartLine],
        payment_method: PaymentMethod,
        delivery_notes: &str,
    ) -> CheckoutResult<String> {
        // 1. identity → branch
        let principal = identity.ok_or(CheckoutError::NoIdentity)?;
        let branch = self
            .directory
            .branch_for_principal(principal)
            .await?
            .ok_or(CheckoutError::NoIdentity)?;

        // 2. cart must have lines
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // 3. totals; the persisted amount excludes shipping
        let totals = procura_core::compute_totals(lines, &self.rules)?;
        let total_amount = totals.subtotal + totals.tax;

        // 4. header
        let order_number = order_number_at(Utc::now());
        let order_id = self
            .store
            .insert_order_header(&order_number, &branch.id, total_amount, totals.tax)
            .await?;

        info!(
            order_number = %order_number,
            order_id = %order_id,
            branch_id = %branch.id,
            "Order header created"
        );

        // 5. items (snapshot prices from the cart lines)
        let items: Vec<NewOrderItem> = lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        if let Err(source) = self.store.insert_order_items(&order_id, &items).await {
            return Err(self.compensate(order_id, source).await);
        }

        // 6. initial PO document, pending until fulfillment generates it
        let po_insert = self
            .store
            .insert_document(
                &order_id,
                DocumentKind::Po,
                &po_number_for(&order_number),
                PO_PLACEHOLDER_URL,
                DocumentStatus::Pending,
            )
            .await;
        if let Err(source) = po_insert {
            return Err(self.compensate(order_id, source).await);
        }

        // 7. notify; failures never fail the submission
        let notice = OrderNotice {
            order_number: order_number.clone(),
            amount: total_amount,
            item_count: lines.len(),
            payment_method,
            delivery_notes: delivery_notes.to_string(),
        };
        if let Err(e) = self.notifier.order_submitted(&notice).await {
            warn!(order_number = %order_number, error = %e, "Order notification failed");
        }

        info!(order_number = %order_number, total = %total_amount, "Order submitted");
        Ok(order_number)
    }

    /// Compensating action: remove the half-written order. The original
    /// failure always wins; a compensation failure is logged and reported
    /// through the `compensated` flag, never as the error itself.
    async fn compensate(&self, order_id: String, source: DbError) -> CheckoutError {
        warn!(order_id = %order_id, error = %source, "Persistence step failed, compensating");

        let compensated = match self.store.delete_order(&order_id).await {
            Ok(()) => true,
            Err(delete_err) => {
                error!(
                    order_id = %order_id,
                    error = %delete_err,
                    "Compensation failed, orphaned order rows remain"
                );
                false
            }
        };

        CheckoutError::Persistence {
            order_id,
            compensated,
            source,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
