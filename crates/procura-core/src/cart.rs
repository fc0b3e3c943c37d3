//! # Cart Aggregate
//!
//! The in-memory collection of `{ product snapshot, quantity }` entries a
//! client session accumulates before checkout.
//!
//! ## Lifecycle
//! The cart is an explicit context object owned by the caller and bound to
//! the client session. There is no server-side persistence of an
//! in-progress cart: checkout takes a snapshot of the current lines and
//! hands it to the submission pipeline. A failed submission leaves the
//! cart exactly as it was, so resubmission needs no re-entry.
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product again
//!   increments quantity, never duplicates the line)
//! - `quantity >= 1` always; quantity edits below 1 clamp to 1. Removal is
//!   an explicit separate operation, never a side effect of an edit
//! - Maximum lines and per-line quantity are capped (crate constants)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{self, CartTotals, PricingRules};
use crate::types::Product;
use crate::validation::validate_quantity;

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// ## Snapshot Pattern
/// Product details (sku, name, effective price, tax rate) are copied at the
/// moment of adding. The cart keeps displaying consistent data even if the
/// catalog changes afterwards, and the frozen `unit_price` is what the
/// submission pipeline persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Effective unit price at time of adding (frozen). For a company with
    /// an override this is already the override price.
    pub unit_price: Money,

    /// Tax rate at time of adding; `None` defers to the pricing rules'
    /// fallback rate.
    pub tax_rate_bps: Option<u32>,

    /// Quantity in cart, always >= 1.
    pub quantity: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a cart line by snapshotting a product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.base_price,
            tax_rate_bps: Some(product.tax_rate_bps),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Builds a line from raw parts. Quick-order rows and tests construct
    /// lines without going through a full `Product`.
    pub fn raw(
        product_id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        tax_rate_bps: Option<u32>,
        quantity: i64,
    ) -> Self {
        CartLine {
            product_id: product_id.into(),
            sku: sku.into(),
            name: name.into(),
            unit_price,
            tax_rate_bps,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Line total before tax.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The session-scoped cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increments quantity if already present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increments by `quantity`
    /// - Otherwise: a new line is appended
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] for a non-positive or oversized quantity
    /// - [`CoreError::QuantityTooLarge`] when the merged quantity would
    ///   exceed the per-line cap
    /// - [`CoreError::CartTooLarge`] when the cart is at its line cap
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let merged = line.quantity + quantity;
            if merged > crate::MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: crate::MAX_LINE_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= crate::MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: crate::MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Updates the quantity of a line.
    ///
    /// ## Clamping
    /// A quantity below 1 clamps to 1. Decrementing never removes the line:
    /// removal is [`Cart::remove_line`], an explicit user action, so a
    /// misclick on a stepper can't silently drop an item.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let quantity = quantity.max(1);

        if quantity > crate::MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: crate::MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart {
                product_id: product_id.to_string(),
            }),
        }
    }

    /// Removes a line by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            Err(CoreError::NotInCart {
                product_id: product_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Current lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Snapshot of the lines for handing to the submission pipeline.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Full totals, delegated to the Pricing Engine. The cart carries no
    /// arithmetic of its own.
    pub fn totals(&self, rules: &PricingRules) -> CoreResult<CartTotals> {
        pricing::compute_totals(&self.lines, rules)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockState;

    fn test_product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            description: String::new(),
            base_price: Money::new(price),
            tax_rate_bps: 1000,
            category_id: "office".to_string(),
            brand: "Procura".to_string(),
            stock: StockState::InStock,
            images: vec![],
            is_active: true,
        }
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 349), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("1", 349);

        cart.add_line(&product, 2).unwrap();
        cart.add_line(&product, 3).unwrap();

        // Exactly one line with quantity 5, never two lines
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 349), 3).unwrap();

        cart.update_quantity("1", 0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.update_quantity("1", -5).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        // The line is still there: clamping never removes
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_remove_is_explicit() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 349), 1).unwrap();

        cart.remove_line("1").unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.remove_line("1"),
            Err(CoreError::NotInCart { .. })
        ));
    }

    #[test]
    fn test_update_missing_line_errors() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.update_quantity("ghost", 2),
            Err(CoreError::NotInCart { .. })
        ));
    }

    #[test]
    fn test_snapshot_freezes_effective_price() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 349);
        cart.add_line(&product, 1).unwrap();

        // Catalog price changes after the add; the line keeps the snapshot
        product.base_price = Money::new(999);
        assert_eq!(cart.lines()[0].unit_price.amount(), 349);
    }

    #[test]
    fn test_totals_delegate_to_pricing() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 349), 10).unwrap();

        let totals = cart.totals(&PricingRules::default()).unwrap();
        assert_eq!(totals.subtotal.amount(), 3490);
        assert_eq!(totals.tax.amount(), 340);
        assert_eq!(totals.shipping_fee.amount(), 550);
    }

    #[test]
    fn test_quantity_caps() {
        let mut cart = Cart::new();
        let product = test_product("1", 349);

        cart.add_line(&product, crate::MAX_LINE_QUANTITY).unwrap();
        assert!(matches!(
            cart.add_line(&product, 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 349), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
