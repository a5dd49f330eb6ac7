//! Declarative query intent over a single entity.
//!
//! A [`Specification`] says *which* rows to select, *how* to order them and
//! *which window* to return. It carries no connection and runs nothing; the
//! [`SpecificationEvaluator`](crate::evaluator::SpecificationEvaluator) is the
//! only place that turns it into SQL.
//!
//! ```ignore
//! use database::specification::{Direction, Specification};
//!
//! let spec = Specification::<product::Entity>::new()
//!     .filter(product::Column::Brand.is_in(["Angular", "React"]))
//!     .order_by(product::Column::Price, Direction::Desc)
//!     .page(1, 6);
//! ```

use sea_orm::sea_query::IntoCondition;
use sea_orm::{Condition, EntityTrait, Order};

/// Sort direction for a specification's ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// Largest offset or limit the SQL backends accept (`BIGINT`).
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// Offset/limit window applied after filtering and ordering.
///
/// Both bounds are capped at [`MAX_WINDOW`]; a window past the last row is
/// simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: u64,
    pub take: u64,
}

impl Paging {
    pub fn new(skip: u64, take: u64) -> Self {
        Self {
            skip: skip.min(MAX_WINDOW),
            take: take.min(MAX_WINDOW),
        }
    }

    /// Window for a 1-based page. Page indexes below 1 are treated as page 1.
    pub fn for_page(page_index: u64, page_size: u64) -> Self {
        let page_index = page_index.max(1);
        Self::new((page_index - 1).saturating_mul(page_size), page_size)
    }
}

/// Shape of the query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection<C> {
    /// Full entity models
    #[default]
    Entities,
    /// Unique values of one column, ascending
    Distinct(C),
}

/// Immutable query intent: criteria, ordering, paging and projection.
#[derive(Debug, Clone)]
pub struct Specification<E: EntityTrait> {
    criteria: Option<Condition>,
    ordering: Option<(E::Column, Direction)>,
    paging: Option<Paging>,
    projection: Projection<E::Column>,
}

impl<E: EntityTrait> Default for Specification<E> {
    fn default() -> Self {
        Self {
            criteria: None,
            ordering: None,
            paging: None,
            projection: Projection::Entities,
        }
    }
}

impl<E: EntityTrait> Specification<E> {
    /// Matches every entity, unordered, unpaged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct values of `column`. Never paged.
    pub fn distinct(column: E::Column) -> Self {
        Self {
            projection: Projection::Distinct(column),
            ..Self::default()
        }
    }

    /// Conjoins a predicate with any criteria already present.
    pub fn filter<C>(mut self, predicate: C) -> Self
    where
        C: IntoCondition,
    {
        let criteria = self.criteria.take().unwrap_or_else(Condition::all);
        self.criteria = Some(criteria.add(predicate.into_condition()));
        self
    }

    /// Replaces the ordering key.
    pub fn order_by(mut self, column: E::Column, direction: Direction) -> Self {
        self.ordering = Some((column, direction));
        self
    }

    /// Restricts the result to `take` entities after skipping `skip`.
    ///
    /// Ignored for distinct projections.
    pub fn paginate(mut self, paging: Paging) -> Self {
        if matches!(self.projection, Projection::Entities) {
            self.paging = Some(paging);
        }
        self
    }

    /// Shorthand for `paginate(Paging::for_page(page_index, page_size))`.
    pub fn page(self, page_index: u64, page_size: u64) -> Self {
        self.paginate(Paging::for_page(page_index, page_size))
    }

    /// Same criteria and ordering, no paging window.
    pub fn without_paging(&self) -> Self {
        Self {
            paging: None,
            ..self.clone()
        }
    }

    pub fn criteria(&self) -> Option<&Condition> {
        self.criteria.as_ref()
    }

    pub fn ordering(&self) -> Option<(E::Column, Direction)> {
        self.ordering
    }

    pub fn paging(&self) -> Option<Paging> {
        self.paging
    }

    pub fn projection(&self) -> Projection<E::Column> {
        self.projection
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sea_orm::entity::prelude::*;

    pub(crate) mod widget {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "widgets")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: String,
            pub category: String,
            pub weight: i32,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    #[test]
    fn paging_for_first_page_skips_nothing() {
        assert_eq!(Paging::for_page(1, 6), Paging::new(0, 6));
    }

    #[test]
    fn paging_for_later_page() {
        assert_eq!(Paging::for_page(3, 5), Paging::new(10, 5));
    }

    #[test]
    fn paging_clamps_page_zero_to_first_page() {
        assert_eq!(Paging::for_page(0, 10), Paging::new(0, 10));
    }

    #[test]
    fn huge_page_index_keeps_skip_within_bigint() {
        let paging = Paging::for_page(200_000_000_000_000_000, 50);
        assert_eq!(paging.skip, MAX_WINDOW);
        assert_eq!(paging.take, 50);

        assert_eq!(Paging::new(u64::MAX, u64::MAX), Paging::new(MAX_WINDOW, MAX_WINDOW));
    }

    #[test]
    fn new_specification_is_unrestricted() {
        let spec = Specification::<widget::Entity>::new();
        assert!(spec.criteria().is_none());
        assert!(spec.ordering().is_none());
        assert!(spec.paging().is_none());
        assert!(matches!(spec.projection(), Projection::Entities));
    }

    #[test]
    fn builder_records_ordering_and_paging() {
        let spec = Specification::<widget::Entity>::new()
            .filter(widget::Column::Category.eq("tools"))
            .order_by(widget::Column::Weight, Direction::Desc)
            .page(2, 4);

        assert!(spec.criteria().is_some());
        assert!(matches!(
            spec.ordering(),
            Some((widget::Column::Weight, Direction::Desc))
        ));
        assert_eq!(spec.paging(), Some(Paging::new(4, 4)));
    }

    #[test]
    fn without_paging_keeps_criteria_and_ordering() {
        let spec = Specification::<widget::Entity>::new()
            .filter(widget::Column::Category.eq("tools"))
            .order_by(widget::Column::Name, Direction::Asc)
            .page(3, 2);

        let unpaged = spec.without_paging();
        assert!(unpaged.paging().is_none());
        assert!(unpaged.criteria().is_some());
        assert!(matches!(
            unpaged.ordering(),
            Some((widget::Column::Name, Direction::Asc))
        ));
        assert_eq!(spec.paging(), Some(Paging::new(4, 2)));
    }

    #[test]
    fn distinct_projection_ignores_paging() {
        let spec = Specification::<widget::Entity>::distinct(widget::Column::Category).page(2, 5);
        assert!(matches!(
            spec.projection(),
            Projection::Distinct(widget::Column::Category)
        ));
        assert!(spec.paging().is_none());
    }

    #[test]
    fn direction_maps_to_sea_orm_order() {
        assert!(matches!(Order::from(Direction::Asc), Order::Asc));
        assert!(matches!(Order::from(Direction::Desc), Order::Desc));
    }
}
