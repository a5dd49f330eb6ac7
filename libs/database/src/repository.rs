//! Generic repository over any sea-orm entity, doubling as a unit of work.
//!
//! Reads go straight to the database. Writes are *staged* with
//! [`Repository::add`], [`Repository::update`] and [`Repository::remove`] and
//! only reach the database on [`Repository::commit`] (or [`Repository::save`]),
//! which applies everything inside one transaction.
//!
//! A `BaseRepository` owns its staged changes, so create one per request
//! (the wrapped `DatabaseConnection` is a pool handle and cheap to clone).
//!
//! ```ignore
//! use database::{BaseRepository, Repository};
//!
//! let mut repo = BaseRepository::<product::Entity>::new(db.clone());
//! repo.add(new_product.into());
//! if !repo.save().await {
//!     return Err(ProductError::Persistence(PersistOp::Create));
//! }
//! ```

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityName, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, TransactionTrait,
};
use tracing::{debug, error};

use crate::common::{DatabaseError, DatabaseResult};
use crate::evaluator::SpecificationEvaluator;
use crate::specification::Specification;

/// Primary-key value type of an entity (`i32` for a serial id).
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

#[derive(Debug)]
enum PendingChange<A> {
    Insert(A),
    Update(A),
    Delete(A),
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<M> {
    /// Inserted and updated rows, as stored, in staging order
    pub written: Vec<M>,
    /// Total rows touched by inserts, updates and deletes
    pub rows_affected: u64,
}

/// Data-access contract for one entity type.
#[async_trait]
pub trait Repository<E: EntityTrait>: Send + Sync {
    /// `Ok(None)` when no row has this id.
    async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> DatabaseResult<Option<E::Model>>;

    async fn list_all(&self) -> DatabaseResult<Vec<E::Model>>;

    /// Entities matching the specification, ordered and paged.
    async fn list(&self, spec: &Specification<E>) -> DatabaseResult<Vec<E::Model>>;

    /// Values of a distinct projection.
    async fn list_values(&self, spec: &Specification<E>) -> DatabaseResult<Vec<String>>;

    /// Rows matching the specification's criteria, ignoring ordering and paging.
    async fn count(&self, spec: &Specification<E>) -> DatabaseResult<u64>;

    async fn exists(&self, id: PrimaryKeyOf<E>) -> DatabaseResult<bool>;

    /// Stage an insert. The id is assigned by the database on commit.
    fn add(&mut self, entity: E::ActiveModel);

    /// Stage a full-record update. The caller checks the id beforehand.
    fn update(&mut self, entity: E::ActiveModel);

    /// Stage a delete.
    fn remove(&mut self, entity: E::ActiveModel);

    fn has_changes(&self) -> bool;

    /// Apply all staged changes in a single transaction.
    ///
    /// Either every change lands or none does. Staged changes are consumed
    /// whether or not the commit succeeds.
    async fn commit(&mut self) -> DatabaseResult<Committed<E::Model>>;

    /// [`commit`](Repository::commit) reduced to a success flag.
    ///
    /// `true` only when the transaction committed and touched at least one row.
    /// Failures are logged, not returned.
    async fn save(&mut self) -> bool {
        match self.commit().await {
            Ok(committed) => committed.rows_affected > 0,
            Err(e) => {
                error!(error = %e, "Failed to save staged changes");
                false
            }
        }
    }
}

/// sea-orm backed [`Repository`].
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    pending: Vec<PendingChange<E::ActiveModel>>,
}

impl<E: EntityTrait> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            pending: Vec::new(),
        }
    }
}

#[async_trait]
impl<E> Repository<E> for BaseRepository<E>
where
    E: EntityTrait,
    E::Column: Send + Sync,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelBehavior + Send + Sync,
{
    async fn get_by_id(&self, id: PrimaryKeyOf<E>) -> DatabaseResult<Option<E::Model>> {
        Ok(E::find_by_id(id).one(&self.db).await?)
    }

    async fn list_all(&self) -> DatabaseResult<Vec<E::Model>> {
        Ok(E::find().all(&self.db).await?)
    }

    async fn list(&self, spec: &Specification<E>) -> DatabaseResult<Vec<E::Model>> {
        Ok(SpecificationEvaluator::query(E::find(), spec)
            .all(&self.db)
            .await?)
    }

    async fn list_values(&self, spec: &Specification<E>) -> DatabaseResult<Vec<String>> {
        let query = SpecificationEvaluator::values_query(E::find(), spec).ok_or_else(|| {
            DatabaseError::Generic("list_values requires a distinct projection".to_string())
        })?;

        Ok(query.into_tuple::<String>().all(&self.db).await?)
    }

    async fn count(&self, spec: &Specification<E>) -> DatabaseResult<u64> {
        Ok(SpecificationEvaluator::count_query(E::find(), spec)
            .count(&self.db)
            .await?)
    }

    async fn exists(&self, id: PrimaryKeyOf<E>) -> DatabaseResult<bool> {
        Ok(E::find_by_id(id).count(&self.db).await? > 0)
    }

    fn add(&mut self, entity: E::ActiveModel) {
        self.pending.push(PendingChange::Insert(entity));
    }

    fn update(&mut self, entity: E::ActiveModel) {
        self.pending.push(PendingChange::Update(entity));
    }

    fn remove(&mut self, entity: E::ActiveModel) {
        self.pending.push(PendingChange::Delete(entity));
    }

    fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    async fn commit(&mut self) -> DatabaseResult<Committed<E::Model>> {
        let pending = std::mem::take(&mut self.pending);
        let staged = pending.len();

        let txn = self.db.begin().await?;
        let mut written = Vec::new();
        let mut rows_affected = 0;

        for change in pending {
            match change {
                PendingChange::Insert(entity) => {
                    written.push(entity.insert(&txn).await?);
                    rows_affected += 1;
                }
                PendingChange::Update(entity) => {
                    written.push(entity.update(&txn).await?);
                    rows_affected += 1;
                }
                PendingChange::Delete(entity) => {
                    rows_affected += entity.delete(&txn).await?.rows_affected;
                }
            }
        }

        txn.commit().await?;

        debug!(
            table = E::default().table_name(),
            staged, rows_affected, "Committed unit of work"
        );

        Ok(Committed {
            written,
            rows_affected,
        })
    }
}
