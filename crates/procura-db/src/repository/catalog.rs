//! # Catalog Repository
//!
//! The Catalog Reader: product rows plus per-company price-override
//! resolution.
//!
//! ## Effective Price Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How a Price Gets Resolved                              │
//! │                                                                         │
//! │  list(company?)                                                         │
//! │       │                                                                 │
//! │       ├── fetch active product rows (ordered by name)                  │
//! │       │                                                                 │
//! │       ├── anonymous? ──────────► every price is the list price         │
//! │       │                                                                 │
//! │       └── company context? ────► fetch override rows for EXACTLY       │
//! │                                  the returned product set (never       │
//! │                                  the whole prices table), merge by     │
//! │                                  product id, first non-null wins       │
//! │                                                                         │
//! │  Past this boundary the list/override distinction is invisible:        │
//! │  `Product.base_price` is simply the effective price.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads are pure and per-request; nothing is cached. Two calls with no
//! intervening writes return identical sets.

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use procura_core::{Product, StockState};

/// Columns every product read selects, in `ProductRow` field order.
const PRODUCT_COLUMNS: &str = "id, product_code, name, description, standard_price, \
     tax_rate, brand, category, images, image_url, stock_status, is_active";

/// Raw product row as the backend stores it: nullable everywhere the
/// hosted schema is nullable. Fallbacks live in [`ProductRow::into_product`],
/// nowhere else.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    product_code: Option<String>,
    name: Option<String>,
    description: Option<String>,
    standard_price: Option<i64>,
    tax_rate: Option<i64>,
    brand: Option<String>,
    category: Option<String>,
    images: Option<String>,
    image_url: Option<String>,
    stock_status: Option<String>,
    is_active: Option<bool>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        // images is a JSON array column; fall back to the legacy
        // single-image column, then to no images at all
        let images: Vec<String> = self
            .images
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .filter(|parsed: &Vec<String>| !parsed.is_empty())
            .unwrap_or_else(|| self.image_url.into_iter().collect());

        Product {
            sku: self
                .product_code
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| self.id.clone()),
            id: self.id,
            name: self.name.unwrap_or_else(|| "Unnamed product".to_string()),
            description: self.description.unwrap_or_default(),
            base_price: procura_core::Money::new(self.standard_price.unwrap_or(0)),
            // stored as a percent; out-of-range values fall back like NULL
            tax_rate_bps: (self
                .tax_rate
                .filter(|pct| (0..=10_000).contains(pct))
                .unwrap_or(10) as u32)
                * 100,
            category_id: self.category.unwrap_or_else(|| "uncategorized".to_string()),
            brand: self.brand.unwrap_or_default(),
            stock: StockState::parse(self.stock_status.as_deref().unwrap_or("")),
            images,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OverrideRow {
    product_id: String,
    override_price: Option<i64>,
}

/// Repository for catalog reads and admin-side catalog writes.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists active products with prices resolved for the given company
    /// context (`None` = anonymous, always list prices).
    pub async fn list(&self, company_id: Option<&str>) -> DbResult<Vec<Product>> {
        debug!(company = company_id.unwrap_or("<anonymous>"), "Listing products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let mut products: Vec<Product> = rows.into_iter().map(ProductRow::into_product).collect();

        if let Some(company_id) = company_id {
            let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
            let overrides = self.overrides_for(company_id, &ids).await?;
            for product in &mut products {
                if let Some(&price) = overrides.get(product.id.as_str()) {
                    product.base_price = procura_core::Money::new(price);
                }
            }
        }

        Ok(products)
    }

    /// Gets a product by canonical id or by SKU, price resolved for the
    /// company context.
    ///
    /// One predicate matches both keys. If one row matches by id and a
    /// different row by SKU, that is an upstream configuration error; the
    /// backend returns whichever it finds first and no special-casing
    /// happens here.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - found
    /// * `Ok(None)` - no row matches (distinct from backend failure)
    pub async fn get(
        &self,
        id_or_sku: &str,
        company_id: Option<&str>,
    ) -> DbResult<Option<Product>> {
        // SKU matching is case-insensitive (quick-order input is typed
        // by hand); id matching stays exact
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE id = ?1 OR product_code = ?1 COLLATE NOCASE LIMIT 1"
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id_or_sku)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut product = row.into_product();

        if let Some(company_id) = company_id {
            let overrides = self
                .overrides_for(company_id, &[product.id.as_str()])
                .await?;
            if let Some(&price) = overrides.get(product.id.as_str()) {
                product.base_price = procura_core::Money::new(price);
            }
        }

        Ok(Some(product))
    }

    /// Fetches override prices for exactly the given product set.
    ///
    /// First non-null `override_price` per product wins; additional rows
    /// for the same pair are a data-integrity violation upstream and are
    /// ignored rather than special-cased.
    async fn overrides_for(
        &self,
        company_id: &str,
        product_ids: &[&str],
    ) -> DbResult<HashMap<String, i64>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: Vec<String> = (0..product_ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect();
        let sql = format!(
            "SELECT product_id, override_price FROM prices \
             WHERE company_id = ?1 AND product_id IN ({})",
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, OverrideRow>(&sql).bind(company_id);
        for id in product_ids {
            query = query.bind(*id);
        }

        let rows = query.fetch_all(&self.pool).await?;

        let mut resolved = HashMap::new();
        for row in rows {
            if let Some(price) = row.override_price {
                resolved.entry(row.product_id).or_insert(price);
            }
        }

        debug!(
            company = company_id,
            overrides = resolved.len(),
            "Resolved price overrides"
        );
        Ok(resolved)
    }

    /// Inserts a product (admin/seed surface).
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        let images = if product.images.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&product.images).unwrap_or_default())
        };

        sqlx::query(
            "INSERT INTO products ( \
                id, product_code, name, description, standard_price, \
                tax_rate, brand, category, images, image_url, stock_status, is_active \
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.base_price.amount())
        .bind((product.tax_rate_bps / 100) as i64)
        .bind(&product.brand)
        .bind(&product.category_id)
        .bind(images)
        .bind(Option::<String>::None)
        .bind(product.stock.as_str())
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Creates or replaces a company's override price for a product
    /// (admin/seed surface). `None` stores a null override, which the
    /// reader skips.
    pub async fn set_override(
        &self,
        company_id: &str,
        product_id: &str,
        override_price: Option<i64>,
    ) -> DbResult<()> {
        debug!(company = company_id, product = product_id, "Setting price override");

        sqlx::query(
            "INSERT INTO prices (id, company_id, product_id, override_price) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(company_id)
        .bind(product_id)
        .bind(override_price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
