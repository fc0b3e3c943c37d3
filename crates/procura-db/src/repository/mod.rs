//! # Repository Module
//!
//! Database repository implementations for the Procura storefront backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout / Query Layer                                                │
//! │       │                                                                 │
//! │       │  db.catalog().list(Some(company_id))                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── list(&self, company_id)                                           │
//! │  ├── get(&self, id_or_sku, company_id)                                 │
//! │  └── insert(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (mock the repository)                                  │
//! │  • SQL is isolated in one place                                        │
//! │  • Row-level fallbacks live next to the rows they repair               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Products and per-company price overrides
//! - [`BranchRepository`] - Principal → branch resolution, provisioning
//! - [`OrderRepository`] - Order headers, items, compensation delete
//! - [`DocumentRepository`] - PO/DN/invoice rows

pub mod branch;
pub mod catalog;
pub mod document;
pub mod order;

pub use branch::{BranchRepository, NewBranch};
pub use catalog::CatalogRepository;
pub use document::{DocumentDetail, DocumentRepository};
pub use order::{NewOrderItem, OrderItemDetail, OrderRepository};
