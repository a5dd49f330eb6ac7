//! Product Service - Business logic layer

use database::{BaseRepository, Pagination, Repository, create_paged_result};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::entity::Entity;
use crate::error::{PersistOp, ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ShopParams};
use crate::specification::ProductSpecification;

const CANNOT_UPDATE: &str = "Cannot update this product.";

/// Catalog operations over the shared connection pool.
///
/// Every call works on its own [`BaseRepository`], so staged changes never
/// cross requests.
#[derive(Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn repository(&self) -> BaseRepository<Entity> {
        BaseRepository::new(self.db.clone())
    }

    /// Filtered, sorted page of products plus the total match count
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: &ShopParams) -> ProductResult<Pagination<Product>> {
        let spec = ProductSpecification::from_params(params);
        let page =
            create_paged_result(&self.repository(), &spec, params.page_index, params.page_size)
                .await?;

        Ok(page.map(Product::from))
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository()
            .get_by_id(id)
            .await?
            .map(Product::from)
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut repo = self.repository();
        repo.add(input.into());

        let created = match repo.commit().await {
            Ok(committed) => committed.written.into_iter().next(),
            Err(e) => {
                warn!(error = %e, "Product insert failed");
                None
            }
        };

        let product = created
            .map(Product::from)
            .ok_or(ProductError::Persistence(PersistOp::Create))?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    /// Replaces the stored record. The body id must match `id`.
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: i32, product: Product) -> ProductResult<()> {
        if product.id != id {
            return Err(ProductError::Validation(CANNOT_UPDATE.to_string()));
        }
        product
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let mut repo = self.repository();
        if !repo.exists(id).await? {
            return Err(ProductError::Validation(CANNOT_UPDATE.to_string()));
        }

        repo.update(product.into());
        if !repo.save().await {
            return Err(ProductError::Persistence(PersistOp::Update));
        }

        info!(product_id = id, "Product updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        let mut repo = self.repository();
        let existing = repo
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        repo.remove(existing.into_active_model());
        if !repo.save().await {
            return Err(ProductError::Persistence(PersistOp::Delete));
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Distinct brand names, ascending
    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> ProductResult<Vec<String>> {
        Ok(self
            .repository()
            .list_values(&ProductSpecification::brands())
            .await?)
    }

    /// Distinct product types, ascending
    #[instrument(skip(self))]
    pub async fn list_types(&self) -> ProductResult<Vec<String>> {
        Ok(self
            .repository()
            .list_values(&ProductSpecification::types())
            .await?)
    }
}
