//! # Domain Types
//!
//! Core domain types used throughout Procura.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │ DocumentRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  order_number   │   │  order_id (FK)  │       │
//! │  │  base_price     │   │  status         │   │  kind (po/dn/…) │       │
//! │  │  tax_rate_bps   │   │  total_amount   │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   OrderStatus   │   │     Branch      │       │
//! │  │  bps (u32)      │   │  Pending..      │   │  company scope  │       │
//! │  │  1000 = 10%     │   │  Cancelled      │   │  for pricing    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for storage relations
//! - Business ID: (sku, order_number, document_number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (Japanese consumption tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage (catalog rows store `10`
    /// for 10%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Stock State
// =============================================================================

/// Displayed availability of a product.
///
/// Stored as free text by the backend; [`StockState::parse`] maps unknown
/// values to `InStock`, matching what the storefront has always rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    InStock,
    LowStock,
    OutOfStock,
    /// Availability on request only.
    Contact,
}

impl StockState {
    /// Parses a stored value, defaulting to `InStock` for anything
    /// unrecognized (including NULL rendered as empty string).
    pub fn parse(value: &str) -> Self {
        match value {
            "in_stock" => StockState::InStock,
            "low_stock" => StockState::LowStock,
            "out_of_stock" => StockState::OutOfStock,
            "contact" => StockState::Contact,
            _ => StockState::InStock,
        }
    }

    /// Canonical stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockState::InStock => "in_stock",
            StockState::LowStock => "low_stock",
            StockState::OutOfStock => "out_of_stock",
            StockState::Contact => "contact",
        }
    }
}

impl Default for StockState {
    fn default() -> Self {
        StockState::InStock
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its price already resolved for the requesting
/// identity context.
///
/// ## Effective Price
/// The Catalog Reader replaces `base_price` with a company override when one
/// exists. Past that boundary the distinction is invisible: this is the only
/// price ever displayed or totaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier. Falls back to `id` when
    /// the catalog row has none.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Optional long description.
    pub description: String,

    /// Effective unit price, exclusive of tax.
    pub base_price: Money,

    /// Tax rate in basis points (1000 = 10%).
    pub tax_rate_bps: u32,

    /// Owning category id.
    pub category_id: String,

    /// Brand label.
    pub brand: String,

    /// Displayed availability.
    pub stock: StockState,

    /// Image URLs, most specific first.
    pub images: Vec<String>,

    /// Whether the product is visible (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Price Override
// =============================================================================

/// A company-specific replacement for a product's standard list price.
///
/// At most one row per `(company_id, product_id)` pair is meaningful; the
/// catalog reader takes the first non-null price it sees. Enforcing
/// uniqueness is the admin back-office's job, not this core's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOverride {
    pub company_id: String,
    pub product_id: String,
    pub override_price: Money,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order as rendered to the storefront.
///
/// ## Legacy Vocabulary
/// The write side only ever writes `"ordered"`; older rows may also carry
/// `"canceled"`. Both are normalized at the read boundary so historical
/// data renders correctly without a backfill:
/// ```text
/// ordered  → pending
/// canceled → cancelled
/// (anything unrecognized) → pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Normalizes a stored status value, mapping the legacy vocabulary.
    pub fn normalize(value: &str) -> Self {
        match value {
            "ordered" | "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "canceled" | "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }

    /// Canonical (normalized) representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Status value written on every freshly submitted order. Reads back as
/// [`OrderStatus::Pending`] through [`OrderStatus::normalize`].
pub const INITIAL_ORDER_STATUS: &str = "ordered";

// =============================================================================
// Payment Method
// =============================================================================

/// How the branch settles the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Monthly invoice billing (month-end close, next-month payment).
    Invoice,
    /// Bank transfer in advance.
    BankTransfer,
}

impl PaymentMethod {
    /// Parses a stored value; unknown strings fall back to invoice billing,
    /// the storefront default.
    pub fn parse(value: &str) -> Self {
        match value {
            "bank_transfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Invoice,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Invoice => "invoice",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order header row.
///
/// Created atomically before any line items exist; immutable from this
/// core's perspective afterwards (status transitions belong to the admin
/// back-office).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-readable, time-derived identifier (`ORD-YYYYMMDD-HHMMSS`).
    pub order_number: String,
    pub branch_id: String,
    pub status: OrderStatus,
    /// Subtotal + tax. Shipping is a presentation-time addition and is
    /// never persisted on the header.
    pub total_amount: Money,
    pub tax_amount: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item belonging to an order.
///
/// Uses the snapshot pattern: `unit_price` is the effective price at
/// submission time, frozen even if the catalog changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderItem {
    /// Line total before tax (unit_price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Documents
// =============================================================================

/// The three document types issued across an order's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Purchase order - created with the order itself.
    Po,
    /// Delivery note - created by fulfillment, absent until then.
    Dn,
    /// Invoice - created by fulfillment, absent until then.
    Invoice,
}

impl DocumentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "po" => Some(DocumentKind::Po),
            "dn" => Some(DocumentKind::Dn),
            "invoice" => Some(DocumentKind::Invoice),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Po => "po",
            DocumentKind::Dn => "dn",
            DocumentKind::Invoice => "invoice",
        }
    }
}

/// Whether a document file can be fetched yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Available,
}

impl DocumentStatus {
    /// Anything other than an explicit `"pending"` is treated as available,
    /// matching the storefront's permissive historical reads.
    pub fn parse(value: &str) -> Self {
        if value == "pending" {
            DocumentStatus::Pending
        } else {
            DocumentStatus::Available
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Available => "available",
        }
    }
}

/// A PO/DN/invoice row attached to an order.
///
/// `url` is an opaque fetchable reference; this core never interprets its
/// bytes, only gates on presence and [`DocumentStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub order_id: String,
    pub kind: DocumentKind,
    pub document_number: String,
    pub url: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Branch
// =============================================================================

/// A company's individual ordering location.
///
/// Order history and price overrides are scoped to the branch's company;
/// the branch itself owns the orders. Resolved from the opaque identity
/// the authentication collaborator provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percent() {
        assert_eq!(TaxRate::from_percent(10).bps(), 1000);
        assert_eq!(TaxRate::from_percent(8).bps(), 800);
    }

    #[test]
    fn test_tax_rate_default_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
    }

    #[test]
    fn test_stock_state_parse_fallback() {
        assert_eq!(StockState::parse("low_stock"), StockState::LowStock);
        assert_eq!(StockState::parse("discontinued"), StockState::InStock);
        assert_eq!(StockState::parse(""), StockState::InStock);
    }

    #[test]
    fn test_order_status_normalizes_legacy_values() {
        assert_eq!(OrderStatus::normalize("ordered"), OrderStatus::Pending);
        assert_eq!(OrderStatus::normalize("canceled"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::normalize("cancelled"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::normalize("shipped"), OrderStatus::Shipped);
        assert_eq!(OrderStatus::normalize("???"), OrderStatus::Pending);
    }

    #[test]
    fn test_fresh_order_reads_back_as_pending() {
        assert_eq!(
            OrderStatus::normalize(INITIAL_ORDER_STATUS),
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("invoice"), PaymentMethod::Invoice);
        assert_eq!(
            PaymentMethod::parse("bank_transfer"),
            PaymentMethod::BankTransfer
        );
        assert_eq!(PaymentMethod::parse("cash???"), PaymentMethod::Invoice);
    }

    #[test]
    fn test_document_kind_round_trip() {
        for kind in [DocumentKind::Po, DocumentKind::Dn, DocumentKind::Invoice] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("receipt"), None);
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            id: "i1".into(),
            order_id: "o1".into(),
            product_id: "p1".into(),
            quantity: 10,
            unit_price: Money::new(349),
        };
        assert_eq!(item.line_total().amount(), 3490);
    }
}
