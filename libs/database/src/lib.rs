//! Data-access layer for the catalog.
//!
//! Query intent is described with a [`Specification`], turned into SQL by the
//! [`SpecificationEvaluator`] and executed through a [`Repository`] that also
//! stages writes until they are committed together. Listings come back wrapped
//! in a [`Pagination`] envelope.
//!
//! # Features
//!
//! - `postgres` (default) - connection pool, retry, migrations and health checks
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::{BaseRepository, Specification, create_paged_result};
//!
//! let repo = BaseRepository::<product::Entity>::new(db.clone());
//! let spec = Specification::new()
//!     .order_by(product::Column::Name, Direction::Asc)
//!     .page(1, 6);
//! let page = create_paged_result(&repo, &spec, 1, 6).await?;
//! ```

pub mod common;
pub mod evaluator;
pub mod pagination;
pub mod repository;
pub mod specification;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
pub use evaluator::SpecificationEvaluator;
pub use pagination::{Pagination, create_paged_result};
pub use repository::{BaseRepository, Committed, PrimaryKeyOf, Repository};
pub use specification::{Direction, Paging, Projection, Specification};
