//! # procura-db: Storage Layer for the Procura Storefront
//!
//! This crate provides database access for the Procura B2B storefront
//! backend. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Procura Data Flow                                 │
//! │                                                                         │
//! │  Checkout pipeline / read queries (procura-checkout)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    procura-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (catalog.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CatalogRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ OrderRepo     │    │              │  │   │
//! │  │   │ Management    │    │ BranchRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (procura.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, order, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use procura_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/procura.db");
//! let db = Database::new(config).await?;
//!
//! let products = db.catalog().list(Some(company_id)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::branch::{BranchRepository, NewBranch};
pub use repository::catalog::CatalogRepository;
pub use repository::document::{DocumentDetail, DocumentRepository};
pub use repository::order::{NewOrderItem, OrderItemDetail, OrderRepository};
