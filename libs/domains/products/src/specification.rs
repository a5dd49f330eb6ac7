//! Maps shop query parameters onto product specifications.

use database::{Direction, Specification};
use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};

use crate::entity::{Column, Entity};
use crate::models::{ProductSort, ShopParams};

pub type ProductSpec = Specification<Entity>;

pub struct ProductSpecification;

impl ProductSpecification {
    /// Search, brand and type predicates are AND-ed; brands and types each
    /// match any of their listed values.
    ///
    /// Search compares the already lower-cased term with `LOWER(name)`, so
    /// non-ASCII case folding follows the backend (see [`ShopParams::search`]).
    pub fn from_params(params: &ShopParams) -> ProductSpec {
        let mut spec = ProductSpec::new();

        if let Some(search) = &params.search {
            let pattern = LikeExpr::new(format!("%{}%", escape_like(search))).escape('\\');
            spec = spec.filter(Expr::expr(Func::lower(Expr::col((Entity, Column::Name)))).like(pattern));
        }
        if !params.brands.is_empty() {
            spec = spec.filter(Column::Brand.is_in(params.brands.iter().cloned()));
        }
        if !params.types.is_empty() {
            spec = spec.filter(Column::ProductType.is_in(params.types.iter().cloned()));
        }

        let (column, direction) = match params.sort {
            ProductSort::Name => (Column::Name, Direction::Asc),
            ProductSort::PriceAsc => (Column::Price, Direction::Asc),
            ProductSort::PriceDesc => (Column::Price, Direction::Desc),
        };

        spec.order_by(column, direction)
            .page(params.page_index, params.page_size)
    }

    /// Distinct non-empty brands
    pub fn brands() -> ProductSpec {
        ProductSpec::distinct(Column::Brand).filter(Column::Brand.ne(""))
    }

    /// Distinct non-empty product types
    pub fn types() -> ProductSpec {
        ProductSpec::distinct(Column::ProductType).filter(Column::ProductType.ne(""))
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{Paging, Projection, SpecificationEvaluator};
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn sql(spec: &ProductSpec) -> String {
        SpecificationEvaluator::query(Entity::find(), spec)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn default_params_sort_by_name_first_page() {
        let spec = ProductSpecification::from_params(&ShopParams::default());

        assert!(spec.criteria().is_none());
        assert!(matches!(
            spec.ordering(),
            Some((Column::Name, Direction::Asc))
        ));
        assert_eq!(spec.paging(), Some(Paging::new(0, 6)));
    }

    #[test]
    fn brand_filter_with_price_ascending() {
        let params = ShopParams {
            brands: vec!["A".to_string()],
            sort: ProductSort::PriceAsc,
            page_size: 10,
            ..ShopParams::default()
        };

        let sql = sql(&ProductSpecification::from_params(&params));

        assert!(sql.contains(r#""products"."brand" IN ('A')"#), "{sql}");
        assert!(
            sql.contains(r#"ORDER BY "products"."price" ASC, "products"."id" ASC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 10"), "{sql}");
    }

    #[test]
    fn price_descending() {
        let params = ShopParams {
            sort: ProductSort::PriceDesc,
            ..ShopParams::default()
        };

        let spec = ProductSpecification::from_params(&params);
        assert!(matches!(
            spec.ordering(),
            Some((Column::Price, Direction::Desc))
        ));
    }

    #[test]
    fn search_brand_and_type_are_all_required() {
        let params = ShopParams {
            brands: vec!["A".to_string(), "B".to_string()],
            types: vec!["Hats".to_string()],
            search: Some("red".to_string()),
            ..ShopParams::default()
        };

        let sql = sql(&ProductSpecification::from_params(&params));

        assert!(sql.contains(r#"LOWER("products"."name") LIKE '%red%'"#), "{sql}");
        assert!(sql.contains(r#""products"."brand" IN ('A', 'B')"#), "{sql}");
        assert!(sql.contains(r#""products"."type" IN ('Hats')"#), "{sql}");
        assert_eq!(sql.matches(" AND ").count(), 2, "{sql}");
    }

    #[test]
    fn later_page_skips_earlier_rows() {
        let params = ShopParams {
            page_index: 3,
            page_size: 4,
            ..ShopParams::default()
        };

        let spec = ProductSpecification::from_params(&params);
        assert_eq!(spec.paging(), Some(Paging::new(8, 4)));
    }

    #[test]
    fn like_wildcards_in_search_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn brand_and_type_lists_are_distinct_projections() {
        assert!(matches!(
            ProductSpecification::brands().projection(),
            Projection::Distinct(Column::Brand)
        ));
        assert!(matches!(
            ProductSpecification::types().projection(),
            Projection::Distinct(Column::ProductType)
        ));
        assert!(ProductSpecification::brands().paging().is_none());
    }
}
