//! # Quick-Order Helpers
//!
//! The bulk-entry surface: a buyer types SKUs and quantities into a grid,
//! each row resolves against the catalog (company pricing included) and
//! lands in the same cart the regular flow uses. The per-row preview uses
//! the same floor-rule tax math as checkout, so the grid's numbers always
//! match what submission will charge.

use tracing::debug;

use crate::error::CheckoutResult;
use procura_core::{pricing, validation, Cart, CoreError, Money, Product};
use procura_db::CatalogRepository;

/// The outcome of one quick-order row: the resolved product plus its
/// line-level price preview.
#[derive(Debug, Clone)]
pub struct QuickAdd {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: i64,
    pub line_subtotal: Money,
    pub line_tax: Money,
}

/// Resolves a hand-typed SKU and adds it to the cart.
///
/// Input is trimmed and matched case-insensitively (people type `cpp-a4`
/// for `CPP-A4`). An unknown SKU is `Ok(None)` so the grid can flag the
/// row without aborting the rest of a pasted batch.
pub async fn add_sku_to_cart(
    catalog: &CatalogRepository,
    company_id: Option<&str>,
    cart: &mut Cart,
    sku: &str,
    quantity: i64,
) -> CheckoutResult<Option<QuickAdd>> {
    validation::validate_sku(sku).map_err(CoreError::from)?;
    let sku = sku.trim();

    let Some(product) = catalog.get(sku, company_id).await? else {
        debug!(sku, "Quick-order SKU not found");
        return Ok(None);
    };

    cart.add_line(&product, quantity)?;

    let (line_subtotal, line_tax) =
        pricing::line_preview(product.base_price, product.tax_rate(), quantity)?;

    Ok(Some(quick_add(product, quantity, line_subtotal, line_tax)))
}

fn quick_add(product: Product, quantity: i64, line_subtotal: Money, line_tax: Money) -> QuickAdd {
    QuickAdd {
        product_id: product.id,
        sku: product.sku,
        product_name: product.name,
        quantity,
        line_subtotal,
        line_tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use procura_core::StockState;
    use procura_db::{Database, DbConfig};

    async fn db_with_paper() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let company_id = db.branches().insert_company("Acme").await.unwrap();

        let paper = Product {
            id: "prod-paper".to_string(),
            sku: "CPP-A4-250".to_string(),
            name: "Copy Paper".to_string(),
            description: String::new(),
            base_price: Money::new(349),
            tax_rate_bps: 1000,
            category_id: "office-supplies".to_string(),
            brand: String::new(),
            stock: StockState::InStock,
            images: vec![],
            is_active: true,
        };
        db.catalog().insert(&paper).await.unwrap();
        db.catalog()
            .set_override(&company_id, "prod-paper", Some(299))
            .await
            .unwrap();
        (db, company_id)
    }

    #[tokio::test]
    async fn test_case_insensitive_sku_adds_with_preview() {
        let (db, company_id) = db_with_paper().await;
        let mut cart = Cart::new();

        let added = add_sku_to_cart(
            &db.catalog(),
            Some(&company_id),
            &mut cart,
            "  cpp-a4-250 ",
            10,
        )
        .await
        .unwrap()
        .expect("sku should resolve");

        // preview at the company's override price, same floor rule
        assert_eq!(added.line_subtotal, Money::new(2990));
        assert_eq!(added.line_tax, Money::new(290));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].unit_price, Money::new(299));
    }

    #[tokio::test]
    async fn test_unknown_sku_is_none_and_cart_untouched() {
        let (db, _company) = db_with_paper().await;
        let mut cart = Cart::new();

        let added = add_sku_to_cart(&db.catalog(), None, &mut cart, "NOPE-000", 1)
            .await
            .unwrap();
        assert!(added.is_none());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_blank_sku_is_a_validation_error() {
        let (db, _company) = db_with_paper().await;
        let mut cart = Cart::new();

        let err = add_sku_to_cart(&db.catalog(), None, &mut cart, "   ", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_bad_quantity_surfaces_and_leaves_cart_untouched() {
        let (db, _company) = db_with_paper().await;
        let mut cart = Cart::new();

        let err = add_sku_to_cart(&db.catalog(), None, &mut cart, "CPP-A4-250", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(_)));
        assert!(cart.is_empty());
    }
}
