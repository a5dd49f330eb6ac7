//! Products Domain
//!
//! Catalog of products backed by the generic repository in `database`.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business rules, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │Specification│  ← Shop query → filter, sort, page
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← database::BaseRepository<entity::Entity>
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{ProductService, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = sea_orm::Database::connect("postgres://localhost/catalog").await?;
//! let router = handlers::router(ProductService::new(db));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod specification;

pub use error::{PersistOp, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CreateProduct, Product, ProductSort, ShopParams};
pub use service::ProductService;
pub use specification::{ProductSpec, ProductSpecification};
