//! End-to-end submission demo against an in-memory database.
//!
//! ```bash
//! cargo run -p procura-checkout --example submit
//! RUST_LOG=debug cargo run -p procura-checkout --example submit
//! ```

use procura_checkout::{CheckoutPipeline, LoggingNotifier, OrderQueries};
use procura_core::{Cart, Money, PaymentMethod, PricingRules, Product, StockState};
use procura_db::{Database, DbConfig, NewBranch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db = Database::new(DbConfig::in_memory()).await?;

    // Provision a company, a branch linked to our demo principal, and a
    // small catalog with one override price.
    let company_id = db.branches().insert_company("Yamakawa Trading Co.").await?;
    db.branches()
        .insert_branch(&NewBranch {
            company_id: company_id.clone(),
            name: "Shinjuku Branch".to_string(),
            address: "2-8-1 Nishi-Shinjuku, Tokyo".to_string(),
            phone: "03-5321-0000".to_string(),
            login_id: "yamakawa-shinjuku".to_string(),
            email: "orders@yamakawa.example".to_string(),
            auth_user_id: "demo-principal".to_string(),
        })
        .await?;

    let paper = Product {
        id: "prod-paper".to_string(),
        sku: "CPP-A4-250".to_string(),
        name: "Copy Paper A4 250 Sheets".to_string(),
        description: String::new(),
        base_price: Money::new(349),
        tax_rate_bps: 1000,
        category_id: "office-supplies".to_string(),
        brand: "OfficePro".to_string(),
        stock: StockState::InStock,
        images: vec![],
        is_active: true,
    };
    let toner = Product {
        id: "prod-toner".to_string(),
        sku: "TNR-BK-01".to_string(),
        name: "Toner Cartridge Black".to_string(),
        base_price: Money::new(1280),
        ..paper.clone()
    };
    db.catalog().insert(&paper).await?;
    db.catalog().insert(&toner).await?;
    db.catalog().set_override(&company_id, "prod-paper", Some(299)).await?;

    // Build a cart with effective (company-resolved) prices.
    let mut cart = Cart::new();
    let paper = db.catalog().get("CPP-A4-250", Some(&company_id)).await?.unwrap();
    let toner = db.catalog().get("TNR-BK-01", Some(&company_id)).await?.unwrap();
    cart.add_line(&paper, 10)?;
    cart.add_line(&toner, 5)?;

    let totals = cart.totals(&PricingRules::default())?;
    println!("Cart:     {} lines, subtotal {}", cart.line_count(), totals.subtotal);
    println!("Tax:      {}", totals.tax);
    println!("Shipping: {}", totals.shipping_fee);
    println!("Total:    {}", totals.grand_total);

    // Submit through the pipeline and read the result back.
    let pipeline = CheckoutPipeline::new(db.clone(), db.clone(), LoggingNotifier);
    let order_number = pipeline
        .submit_order(
            Some("demo-principal"),
            cart.lines(),
            PaymentMethod::Invoice,
            "deliver to loading dock",
        )
        .await?;
    println!("\nSubmitted: {order_number}");

    let queries = OrderQueries::new(db.clone(), db.clone());
    for order in queries.list_orders(Some("demo-principal")).await? {
        println!(
            "History:   {} [{}] {} ({} items, total {})",
            order.order_number,
            order.order_date,
            order.status.as_str(),
            order.items.len(),
            order.total
        );
    }
    for doc in queries.list_documents(Some("demo-principal")).await? {
        println!(
            "Document:  {} {} [{}] amount {}",
            doc.kind.as_str(),
            doc.document_number,
            doc.status.as_str(),
            doc.amount
        );
    }

    Ok(())
}
