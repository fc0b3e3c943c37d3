//! # Pricing Engine
//!
//! Pure totals math shared by every surface that shows money.
//!
//! ## One Implementation, Three Surfaces
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cart page ──────────┐                                                 │
//! │                       │                                                 │
//! │   Checkout page ──────┼──► compute_totals(lines, rules) ──► CartTotals  │
//! │                       │                                                 │
//! │   Quick order ────────┘                                                 │
//! │                                                                         │
//! │   The three surfaces must never disagree on totals for the same        │
//! │   line set, so none of them carries its own arithmetic.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Rules
//! - `subtotal = Σ unit_price × quantity` (integer units, no rounding)
//! - `tax = Σ floor(unit_price × rate) × quantity` — floored per line
//!   BEFORE the quantity multiply, never on the aggregate
//! - `shipping_fee = 0` for an empty line set; otherwise 0 once the
//!   subtotal reaches the free-shipping threshold, else the flat fee
//! - `grand_total = subtotal + tax + shipping_fee`

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Rules
// =============================================================================

/// Tax and shipping configuration for totals computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRules {
    /// Applied only to lines whose product carries no explicit rate.
    pub tax_rate_fallback_bps: u32,

    /// Subtotal at which shipping becomes free.
    pub free_shipping_threshold: Money,

    /// Flat fee charged below the threshold.
    pub flat_shipping_fee: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            tax_rate_fallback_bps: crate::DEFAULT_TAX_RATE_BPS,
            free_shipping_threshold: Money::new(crate::FREE_SHIPPING_THRESHOLD),
            flat_shipping_fee: Money::new(crate::FLAT_SHIPPING_FEE),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived cart totals. Never stored; recomputed from lines on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping_fee: Money,
    pub grand_total: Money,
}

impl CartTotals {
    /// Totals of an empty line set. Explicitly free shipping: "no items"
    /// is a rule here, not an accident of the threshold comparison.
    pub const fn empty() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            shipping_fee: Money::zero(),
            grand_total: Money::zero(),
        }
    }
}

/// Per-line preview used by the quick-order grid: `(line_subtotal, line_tax)`.
///
/// Same floor rule as [`compute_totals`] so the preview column always
/// matches what checkout will charge.
pub fn line_preview(
    unit_price: Money,
    rate: TaxRate,
    quantity: i64,
) -> CoreResult<(Money, Money)> {
    if quantity < 1 {
        return Err(CoreError::InvalidQuantity { requested: quantity });
    }

    let line_subtotal = unit_price.multiply_quantity(quantity);
    let line_tax = unit_price.floor_tax(rate).multiply_quantity(quantity);
    Ok((line_subtotal, line_tax))
}

/// Computes cart totals from a line set.
///
/// ## Shipping
/// An empty line set ships free. Any non-empty set below the threshold pays
/// the flat fee, including a zero subtotal from fully discounted lines:
/// only reaching the threshold waives shipping. The quick-order surface once
/// also waived it at exactly zero subtotal; that exemption is not carried
/// here, so every caller charges the same fee for the same lines.
///
/// ## Errors
/// [`CoreError::InvalidQuantity`] if any line's quantity is below 1. Lines
/// never reach that state through the cart aggregate; this guards direct
/// callers (quick-order hands lines straight in).
///
/// ## Example
/// ```rust
/// use procura_core::cart::CartLine;
/// use procura_core::money::Money;
/// use procura_core::pricing::{compute_totals, PricingRules};
///
/// let lines = vec![CartLine::raw("p1", "CPP-A4-250", "Copy paper", Money::new(349), Some(1000), 10)];
/// let totals = compute_totals(&lines, &PricingRules::default()).unwrap();
/// assert_eq!(totals.subtotal.amount(), 3490);
/// assert_eq!(totals.tax.amount(), 340); // floor(349 × 0.10) × 10
/// ```
pub fn compute_totals(lines: &[CartLine], rules: &PricingRules) -> CoreResult<CartTotals> {
    if lines.is_empty() {
        return Ok(CartTotals::empty());
    }

    let mut subtotal = Money::zero();
    let mut tax = Money::zero();

    for line in lines {
        let rate = TaxRate::from_bps(line.tax_rate_bps.unwrap_or(rules.tax_rate_fallback_bps));
        let (line_subtotal, line_tax) = line_preview(line.unit_price, rate, line.quantity)?;
        subtotal += line_subtotal;
        tax += line_tax;
    }

    let shipping_fee = if subtotal >= rules.free_shipping_threshold {
        Money::zero()
    } else {
        rules.flat_shipping_fee
    };

    Ok(CartTotals {
        subtotal,
        tax,
        shipping_fee,
        grand_total: subtotal + tax + shipping_fee,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
