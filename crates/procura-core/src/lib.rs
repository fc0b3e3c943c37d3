//! # procura-core: Pure Business Logic for Procura
//!
//! This crate is the **heart** of the Procura storefront. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Procura Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Surfaces                          │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Order History/Documents   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  procura-checkout                               │   │
//! │  │    submission pipeline, read-side projections                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ procura-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   cart    │  │   │
//! │  │   │  Product  │  │   Money   │  │  totals   │  │ CartLine  │  │   │
//! │  │   │   Order   │  │ floor_tax │  │  shipping │  │   merge   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   procura-db (Storage Layer)                    │   │
//! │  │        catalog reads, order/item/document inserts               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, DocumentRecord, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The Pricing Engine: the one place totals are computed
//! - [`cart`] - The Cart Aggregate and its invariants
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same input = same output; timestamps are inputs
//! 2. **No I/O**: Database and network access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole yen (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_totals, CartTotals, PricingRules};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default consumption tax rate in basis points (10%).
///
/// Applied by the catalog reader when a product row carries no explicit
/// rate, and used as [`PricingRules::tax_rate_fallback_bps`] default.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Subtotal (tax-exclusive) at which shipping becomes free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 5000;

/// Flat shipping fee charged below the threshold.
pub const FLAT_SHIPPING_FEE: i64 = 550;

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps submissions a bounded number of row
/// inserts.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
