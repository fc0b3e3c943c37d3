//! End-to-end submission flow against an in-memory SQLite database:
//! provision a company/branch, seed a catalog with an override, submit a
//! cart through the pipeline, and read the result back through the query
//! layer.

use procura_checkout::{CheckoutError, CheckoutPipeline, LoggingNotifier, OrderQueries};
use procura_core::{Cart, DocumentKind, DocumentStatus, Money, OrderStatus, PaymentMethod};
use procura_db::{Database, DbConfig, NewBranch};

async fn provisioned_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let company_id = db.branches().insert_company("Yamakawa Trading").await.unwrap();
    db.branches()
        .insert_branch(&NewBranch {
            company_id: company_id.clone(),
            name: "Shinjuku Branch".to_string(),
            address: "Tokyo".to_string(),
            phone: "03-0000-0000".to_string(),
            login_id: "yamakawa".to_string(),
            email: "orders@yamakawa.example".to_string(),
            auth_user_id: "principal-1".to_string(),
        })
        .await
        .unwrap();

    let paper = procura_core::Product {
        id: "prod-paper".to_string(),
        sku: "CPP-A4-250".to_string(),
        name: "Copy Paper A4 250 Sheets".to_string(),
        description: String::new(),
        base_price: Money::new(349),
        tax_rate_bps: 1000,
        category_id: "office-supplies".to_string(),
        brand: "OfficePro".to_string(),
        stock: procura_core::StockState::InStock,
        images: vec![],
        is_active: true,
    };
    db.catalog().insert(&paper).await.unwrap();
    // the company buys paper below list price
    db.catalog()
        .set_override(&company_id, "prod-paper", Some(299))
        .await
        .unwrap();

    db
}

#[tokio::test]
async fn submitted_order_reads_back_through_the_query_layer() {
    let db = provisioned_db().await;
    let company_id = db
        .branches()
        .find_by_auth_user("principal-1")
        .await
        .unwrap()
        .unwrap()
        .company_id;

    // the cart snapshots the effective (override) price
    let effective = db
        .catalog()
        .get("CPP-A4-250", Some(&company_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(effective.base_price, Money::new(299));

    let mut cart = Cart::new();
    cart.add_line(&effective, 10).unwrap();

    let pipeline = CheckoutPipeline::new(db.clone(), db.clone(), LoggingNotifier);
    let order_number = pipeline
        .submit_order(
            Some("principal-1"),
            cart.lines(),
            PaymentMethod::Invoice,
            "deliver to loading dock",
        )
        .await
        .unwrap();
    assert!(order_number.starts_with("ORD-"));

    // header: subtotal 2990 + tax floor(299*10%)*10 = 290
    let queries = OrderQueries::new(db.clone(), db.clone());
    let orders = queries.list_orders(Some("principal-1")).await.unwrap();
    assert_eq!(orders.len(), 1);

    let view = &orders[0];
    assert_eq!(view.order_number, order_number);
    assert_eq!(view.status, OrderStatus::Pending);
    assert_eq!(view.subtotal, Money::new(2990));
    assert_eq!(view.tax, Money::new(290));
    assert_eq!(view.total, Money::new(3280));
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product_name, "Copy Paper A4 250 Sheets");
    assert_eq!(view.items[0].quantity, 10);
    assert_eq!(view.items[0].unit_price, Money::new(299));
    // the PO exists but is pending, so no fetchable URL yet
    assert!(view.document_urls.is_empty());

    let documents = queries.list_documents(Some("principal-1")).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].kind, DocumentKind::Po);
    assert_eq!(documents[0].status, DocumentStatus::Pending);
    assert_eq!(
        documents[0].document_number,
        format!("PO-{}", order_number.strip_prefix("ORD-").unwrap())
    );
    assert_eq!(documents[0].order_number, order_number);
    assert_eq!(documents[0].amount, Money::new(3280));

    // the pipeline never touches the caller's cart
    assert_eq!(cart.line_count(), 1);
}

#[tokio::test]
async fn list_price_submission_when_company_has_no_override() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let company_id = db.branches().insert_company("No-Override Corp").await.unwrap();
    db.branches()
        .insert_branch(&NewBranch {
            company_id: company_id.clone(),
            name: "HQ".to_string(),
            address: String::new(),
            phone: String::new(),
            login_id: "no-override".to_string(),
            email: "hq@no-override.example".to_string(),
            auth_user_id: "principal-2".to_string(),
        })
        .await
        .unwrap();

    let paper = procura_core::Product {
        id: "prod-paper".to_string(),
        sku: "CPP-A4-250".to_string(),
        name: "Copy Paper A4 250 Sheets".to_string(),
        description: String::new(),
        base_price: Money::new(349),
        tax_rate_bps: 1000,
        category_id: "office-supplies".to_string(),
        brand: String::new(),
        stock: procura_core::StockState::InStock,
        images: vec![],
        is_active: true,
    };
    db.catalog().insert(&paper).await.unwrap();

    let effective = db
        .catalog()
        .get("CPP-A4-250", Some(&company_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(effective.base_price, Money::new(349));

    let mut cart = Cart::new();
    cart.add_line(&effective, 10).unwrap();

    let pipeline = CheckoutPipeline::new(db.clone(), db.clone(), LoggingNotifier);
    let order_number = pipeline
        .submit_order(Some("principal-2"), cart.lines(), PaymentMethod::Invoice, "")
        .await
        .unwrap();

    let queries = OrderQueries::new(db.clone(), db.clone());
    let orders = queries.list_orders(Some("principal-2")).await.unwrap();
    assert_eq!(orders[0].order_number, order_number);
    // subtotal 3490, tax floor(349×10%)×10 = 340
    assert_eq!(orders[0].subtotal, Money::new(3490));
    assert_eq!(orders[0].tax, Money::new(340));
    assert_eq!(orders[0].total, Money::new(3830));
    assert_eq!(orders[0].items[0].quantity, 10);
    assert_eq!(orders[0].items[0].unit_price, Money::new(349));
}

#[tokio::test]
async fn unlinked_principal_cannot_submit_but_reads_empty() {
    let db = provisioned_db().await;

    let product = db.catalog().get("CPP-A4-250", None).await.unwrap().unwrap();
    let mut cart = Cart::new();
    cart.add_line(&product, 1).unwrap();

    let pipeline = CheckoutPipeline::new(db.clone(), db.clone(), LoggingNotifier);
    let err = pipeline
        .submit_order(Some("stranger"), cart.lines(), PaymentMethod::Invoice, "")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::NoIdentity));

    let queries = OrderQueries::new(db.clone(), db.clone());
    assert!(queries.list_orders(Some("stranger")).await.unwrap().is_empty());
    assert!(queries.list_documents(None).await.unwrap().is_empty());
}
