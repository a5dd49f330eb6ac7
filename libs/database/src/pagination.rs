//! Page-of-results envelope returned by every listing endpoint.

use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::DatabaseResult;
use crate::repository::Repository;
use crate::specification::Specification;

/// One page of items plus the metadata needed to page through the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    /// 1-based index of this page, as requested
    pub page_index: u64,
    /// Requested page size; `items` never holds more
    pub page_size: u64,
    /// Items matching the filter before paging
    pub total_count: u64,
    /// Current page, filtered and sorted
    pub items: Vec<T>,
}

impl<T> Pagination<T> {
    /// Assembles an envelope. Nothing is recomputed.
    pub fn new(page_index: u64, page_size: u64, total_count: u64, items: Vec<T>) -> Self {
        Self {
            page_index,
            page_size,
            total_count,
            items,
        }
    }

    /// Converts the items, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Pagination<U>
    where
        F: FnMut(T) -> U,
    {
        Pagination {
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}

/// Runs one specification twice: once paged for the items, once for the total.
///
/// Both queries share the same criteria, so the count always describes the
/// same filtered set the page was cut from.
pub async fn create_paged_result<E, R>(
    repo: &R,
    spec: &Specification<E>,
    page_index: u64,
    page_size: u64,
) -> DatabaseResult<Pagination<E::Model>>
where
    E: EntityTrait,
    R: Repository<E> + ?Sized,
{
    let items = repo.list(spec).await?;
    let total_count = repo.count(spec).await?;

    Ok(Pagination::new(page_index, page_size, total_count, items))
}
