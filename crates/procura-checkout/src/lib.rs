//! # procura-checkout: Orchestration Layer for the Procura Storefront
//!
//! Identity resolution, the order submission pipeline, and the read-side
//! projections - everything between the pure math in `procura-core` and
//! the rows in `procura-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Procura Flow Layer                                 │
//! │                                                                         │
//! │   Caller (HTTP handler, CLI, demo)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 procura-checkout (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │   │
//! │  │   │  submit.rs   │   │  queries.rs  │   │     ports.rs     │  │   │
//! │  │   │              │   │              │   │                  │  │   │
//! │  │   │ Checkout     │   │ OrderView    │   │ BranchDirectory  │  │   │
//! │  │   │ Pipeline     │   │ DocumentView │   │ OrderStore       │  │   │
//! │  │   │ (saga +      │   │ projections  │   │ OrderReader      │  │   │
//! │  │   │  compensate) │   │              │   │ OrderNotifier    │  │   │
//! │  │   └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘  │   │
//! │  │          └─────────────────┴────────────────────┘             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                ▼                                        │
//! │                    procura-db (SQLite) / test fakes                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use procura_checkout::{CheckoutPipeline, LoggingNotifier, OrderQueries};
//!
//! let pipeline = CheckoutPipeline::new(db.clone(), db.clone(), LoggingNotifier);
//! let order_number = pipeline
//!     .submit_order(Some(principal), cart.lines(), PaymentMethod::Invoice, "")
//!     .await?;
//!
//! let queries = OrderQueries::new(db.clone(), db.clone());
//! let history = queries.list_orders(Some(principal)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ports;
pub mod queries;
pub mod quick;
pub mod submit;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CheckoutError, CheckoutResult, NotifyError};
pub use ports::{
    BranchDirectory, DocumentJoinRow, LoggingNotifier, OneOrMany, OrderNotice, OrderNotifier,
    OrderReader, OrderRef, OrderStore,
};
pub use queries::{DocumentView, OrderLineView, OrderQueries, OrderView};
pub use quick::{add_sku_to_cart, QuickAdd};
pub use submit::{order_number_at, po_number_for, CheckoutPipeline, PO_PLACEHOLDER_URL};
