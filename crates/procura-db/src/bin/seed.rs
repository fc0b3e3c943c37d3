//! # Seed Data Generator
//!
//! Populates the database with a demo B2B catalog for development: one
//! company with a linked branch, an office-supplies product set, and a
//! couple of company price overrides so the override-resolution path has
//! something to resolve.
//!
//! ## Usage
//! ```bash
//! cargo run -p procura-db --bin seed
//!
//! # Specify database path
//! cargo run -p procura-db --bin seed -- --db ./data/procura.db
//! ```
//!
//! The demo branch is linked to the principal id `demo-principal`; pass
//! that as the identity when exercising the checkout pipeline against the
//! seeded database.

use std::env;

use procura_core::{Money, Product, StockState};
use procura_db::{Database, DbConfig, NewBranch};
use uuid::Uuid;

/// Demo catalog: (code, name, brand, list price in yen, tax %, stock).
const PRODUCTS: &[(&str, &str, &str, i64, u32, StockState)] = &[
    ("CPP-A4-250", "Copy Paper A4 250 Sheets", "OfficePro", 349, 10, StockState::InStock),
    ("CPP-A3-250", "Copy Paper A3 250 Sheets", "OfficePro", 698, 10, StockState::InStock),
    ("TNR-BK-01", "Toner Cartridge Black", "PrintMax", 1280, 10, StockState::InStock),
    ("TNR-CL-01", "Toner Cartridge Color Set", "PrintMax", 4980, 10, StockState::LowStock),
    ("PEN-GEL-10", "Gel Pen 0.5mm 10-Pack", "Scrivo", 540, 10, StockState::InStock),
    ("ENV-A4-100", "Envelopes A4 100-Pack", "OfficePro", 820, 10, StockState::InStock),
    ("FLD-CLR-20", "Clear Folders 20-Pack", "OfficePro", 312, 10, StockState::InStock),
    ("TAP-PKG-06", "Packing Tape 6-Roll", "SealRight", 1150, 10, StockState::InStock),
    ("STP-STD-01", "Desktop Stapler", "Scrivo", 680, 10, StockState::OutOfStock),
    ("CHR-OFF-01", "Office Chair Standard", "ErgoWorks", 12800, 10, StockState::Contact),
];

/// Overrides the demo company gets: (code, override price).
const OVERRIDES: &[(&str, i64)] = &[("CPP-A4-250", 299), ("TNR-BK-01", 1100)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./procura_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Procura Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./procura_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Procura Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.branches().find_by_auth_user("demo-principal").await?.is_some() {
        println!("⚠ Database already seeded (demo branch exists)");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Company + branch linked to the demo principal
    let company_id = db.branches().insert_company("Yamakawa Trading Co.").await?;
    let branch_id = db
        .branches()
        .insert_branch(&NewBranch {
            company_id: company_id.clone(),
            name: "Shinjuku Branch".to_string(),
            address: "2-8-1 Nishi-Shinjuku, Shinjuku-ku, Tokyo".to_string(),
            phone: "03-5321-0000".to_string(),
            login_id: "yamakawa-shinjuku".to_string(),
            email: "orders@yamakawa.example".to_string(),
            auth_user_id: "demo-principal".to_string(),
        })
        .await?;

    println!("✓ Company {} / branch {}", company_id, branch_id);

    // Catalog
    let mut product_ids = std::collections::HashMap::new();
    for (code, name, brand, price, tax_percent, stock) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: code.to_string(),
            name: name.to_string(),
            description: format!("{} by {}", name, brand),
            base_price: Money::new(*price),
            tax_rate_bps: tax_percent * 100,
            category_id: "office-supplies".to_string(),
            brand: brand.to_string(),
            stock: *stock,
            images: vec![format!("https://placehold.co/600x800?text={}", code)],
            is_active: true,
        };
        db.catalog().insert(&product).await?;
        product_ids.insert(*code, product.id);
    }

    println!("✓ Inserted {} products", PRODUCTS.len());

    // Company price overrides
    for (code, price) in OVERRIDES {
        let product_id = &product_ids[code];
        db.catalog()
            .set_override(&company_id, product_id, Some(*price))
            .await?;
    }

    println!("✓ Inserted {} price overrides", OVERRIDES.len());

    // Verify the override path resolves
    let resolved = db.catalog().list(Some(&company_id)).await?;
    let paper = resolved
        .iter()
        .find(|p| p.sku == "CPP-A4-250")
        .expect("seeded product missing");
    println!("  CPP-A4-250 resolves to {} for the demo company", paper.base_price);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
