//! Applies a [`Specification`] to a sea-orm query.

use sea_orm::{
    EntityTrait, Iterable, PrimaryKeyToColumn, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::specification::{Projection, Specification};

/// Turns specifications into queries. Never executes anything.
pub struct SpecificationEvaluator;

impl SpecificationEvaluator {
    /// Filter, then order, then page.
    ///
    /// Primary-key columns are appended ascending after the requested ordering
    /// so that rows with equal sort keys keep a fixed relative order and pages
    /// never overlap or skip rows.
    pub fn query<E: EntityTrait>(source: Select<E>, spec: &Specification<E>) -> Select<E> {
        let mut query = Self::filtered(source, spec);

        if let Some((column, direction)) = spec.ordering() {
            query = query.order_by(column, direction.into());
        }
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }

        if let Some(paging) = spec.paging() {
            query = query.offset(paging.skip).limit(paging.take);
        }

        query
    }

    /// Criteria only. Ordering and paging never change a count.
    pub fn count_query<E: EntityTrait>(source: Select<E>, spec: &Specification<E>) -> Select<E> {
        Self::filtered(source, spec)
    }

    /// `SELECT DISTINCT column ... ORDER BY column` for distinct projections,
    /// `None` when the specification selects whole entities.
    pub fn values_query<E: EntityTrait>(
        source: Select<E>,
        spec: &Specification<E>,
    ) -> Option<Select<E>> {
        match spec.projection() {
            Projection::Entities => None,
            Projection::Distinct(column) => Some(
                Self::filtered(source, spec)
                    .select_only()
                    .column(column)
                    .distinct()
                    .order_by_asc(column),
            ),
        }
    }

    fn filtered<E: EntityTrait>(source: Select<E>, spec: &Specification<E>) -> Select<E> {
        match spec.criteria() {
            Some(criteria) => source.filter(criteria.clone()),
            None => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::tests::widget;
    use crate::specification::{Direction, Paging};
    use sea_orm::{ColumnTrait, DbBackend, QueryTrait};

    fn sql(query: Select<widget::Entity>) -> String {
        query.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn empty_specification_only_orders_by_primary_key() {
        let spec = Specification::<widget::Entity>::new();
        let sql = sql(SpecificationEvaluator::query(widget::Entity::find(), &spec));

        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(r#"ORDER BY "widgets"."id" ASC"#), "{sql}");
    }

    #[test]
    fn query_applies_filter_order_and_window() {
        let spec = Specification::<widget::Entity>::new()
            .filter(widget::Column::Category.eq("tools"))
            .order_by(widget::Column::Weight, Direction::Desc)
            .paginate(Paging::new(10, 5));

        let sql = sql(SpecificationEvaluator::query(widget::Entity::find(), &spec));

        assert!(sql.contains("WHERE"), "{sql}");
        assert!(sql.contains(r#""widgets"."category" = 'tools'"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "widgets"."weight" DESC, "widgets"."id" ASC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 5"), "{sql}");
        assert!(sql.contains("OFFSET 10"), "{sql}");
    }

    #[test]
    fn count_query_drops_ordering_and_window() {
        let spec = Specification::<widget::Entity>::new()
            .filter(widget::Column::Category.eq("tools"))
            .order_by(widget::Column::Name, Direction::Asc)
            .page(2, 3);

        let sql = sql(SpecificationEvaluator::count_query(
            widget::Entity::find(),
            &spec,
        ));

        assert!(sql.contains("WHERE"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn values_query_selects_distinct_sorted_column() {
        let spec = Specification::<widget::Entity>::distinct(widget::Column::Category)
            .filter(widget::Column::Category.ne(""));

        let query = SpecificationEvaluator::values_query(widget::Entity::find(), &spec)
            .expect("distinct projection yields a query");
        let sql = sql(query);

        assert!(
            sql.starts_with(r#"SELECT DISTINCT "widgets"."category" FROM "widgets""#),
            "{sql}"
        );
        assert!(sql.ends_with(r#"ORDER BY "widgets"."category" ASC"#), "{sql}");
    }

    #[test]
    fn values_query_is_none_for_entity_projection() {
        let spec = Specification::<widget::Entity>::new();
        assert!(SpecificationEvaluator::values_query(widget::Entity::find(), &spec).is_none());
    }
}
