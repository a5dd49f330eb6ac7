use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::entity;

/// Largest page a client may request
pub const MAX_PAGE_SIZE: u64 = 50;
pub const DEFAULT_PAGE_SIZE: u64 = 6;

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// A catalog product as exchanged with clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub picture_url: String,
    /// Product type, e.g. "Boots"
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub product_type: String,
    #[validate(length(min = 1))]
    pub brand: String,
}

impl From<entity::Model> for Product {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            picture_url: model.picture_url,
            product_type: model.product_type,
            brand: model.brand,
        }
    }
}

/// Full-record replacement, id included
impl From<Product> for entity::ActiveModel {
    fn from(product: Product) -> Self {
        Self {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            picture_url: Set(product.picture_url),
            product_type: Set(product.product_type),
            brand: Set(product.brand),
        }
    }
}

/// Payload for creating a product. The id is assigned by the database.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub picture_url: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub product_type: String,
    #[validate(length(min = 1))]
    pub brand: String,
}

impl From<CreateProduct> for entity::ActiveModel {
    fn from(input: CreateProduct) -> Self {
        Self {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            picture_url: Set(input.picture_url),
            product_type: Set(input.product_type),
            brand: Set(input.brand),
        }
    }
}

/// Sort key accepted by the product listing
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProductSort {
    /// Alphabetical by name
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Unknown keys fall back to [`ProductSort::Name`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

/// Shop listing query, normalized while it is parsed
///
/// Malformed values never reject the request: they fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShopParams {
    /// Comma-separated brand names; any of them matches
    #[serde(default, deserialize_with = "comma_separated")]
    #[param(value_type = Option<String>, example = "Angular,React")]
    pub brands: Vec<String>,

    /// Comma-separated product types; any of them matches
    #[serde(default, deserialize_with = "comma_separated")]
    #[param(value_type = Option<String>, example = "Boots,Gloves")]
    pub types: Vec<String>,

    #[serde(default, deserialize_with = "lenient_sort")]
    #[param(value_type = Option<ProductSort>)]
    pub sort: ProductSort,

    /// Case-insensitive substring of the product name
    ///
    /// Lower-cased with full Unicode rules and matched against SQL
    /// `LOWER(name)`. Postgres folds the column the same way; SQLite's
    /// `LOWER` folds ASCII only, so there `Ä` in a name never matches `ä`.
    #[serde(default, deserialize_with = "normalized_search")]
    pub search: Option<String>,

    /// 1-based page number
    #[serde(default = "default_page_index", deserialize_with = "lenient_page_index")]
    #[param(value_type = Option<u64>, minimum = 1)]
    pub page_index: u64,

    #[serde(default = "default_page_size", deserialize_with = "lenient_page_size")]
    #[param(value_type = Option<u64>, minimum = 1, maximum = 50)]
    pub page_size: u64,
}

impl Default for ShopParams {
    fn default() -> Self {
        Self {
            brands: Vec::new(),
            types: Vec::new(),
            sort: ProductSort::default(),
            search: None,
            page_index: default_page_index(),
            page_size: default_page_size(),
        }
    }
}

fn default_page_index() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn comma_separated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}

fn lenient_sort<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ProductSort, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(ProductSort::parse_lenient).unwrap_or_default())
}

fn normalized_search<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty()))
}

fn parse_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

fn lenient_page_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match parse_number(deserializer)? {
        Some(index) if index >= 1 => index as u64,
        _ => default_page_index(),
    })
}

fn lenient_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match parse_number(deserializer)? {
        Some(size) => size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
        None => default_page_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> ShopParams {
        let uri: Uri = format!("/?{query}").parse().unwrap();
        Query::<ShopParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn empty_query_uses_defaults() {
        assert_eq!(parse(""), ShopParams::default());
    }

    #[test]
    fn lists_are_split_and_trimmed() {
        let params = parse("brands=Angular,%20React,,&types=Boots");
        assert_eq!(params.brands, vec!["Angular", "React"]);
        assert_eq!(params.types, vec!["Boots"]);
    }

    #[test]
    fn blank_list_means_no_filter() {
        assert!(parse("brands=").brands.is_empty());
    }

    #[test]
    fn known_sort_keys() {
        assert_eq!(parse("sort=name").sort, ProductSort::Name);
        assert_eq!(parse("sort=priceAsc").sort, ProductSort::PriceAsc);
        assert_eq!(parse("sort=priceDesc").sort, ProductSort::PriceDesc);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_name() {
        assert_eq!(parse("sort=rating").sort, ProductSort::Name);
        assert_eq!(parse("sort=").sort, ProductSort::Name);
    }

    #[test]
    fn search_is_trimmed_and_lowercased() {
        assert_eq!(parse("search=%20Red%20Boots%20").search.as_deref(), Some("red boots"));
        assert_eq!(parse("search=%20%20").search, None);
    }

    #[test]
    fn search_lowercases_non_ascii_letters() {
        assert_eq!(parse("search=%C3%84pfel").search.as_deref(), Some("äpfel"));
    }

    #[test]
    fn page_index_below_one_or_garbage_becomes_one() {
        assert_eq!(parse("pageIndex=0").page_index, 1);
        assert_eq!(parse("pageIndex=-4").page_index, 1);
        assert_eq!(parse("pageIndex=two").page_index, 1);
        assert_eq!(parse("pageIndex=3").page_index, 3);
    }

    #[test]
    fn huge_page_index_is_kept_and_maps_to_a_bounded_window() {
        let params = parse("pageIndex=200000000000000000&pageSize=50");
        assert_eq!(params.page_index, 200_000_000_000_000_000);

        let spec = crate::specification::ProductSpecification::from_params(&params);
        let paging = spec.paging().unwrap();
        assert!(paging.skip <= i64::MAX as u64);
        assert_eq!(paging.take, 50);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(parse("pageSize=500").page_size, MAX_PAGE_SIZE);
        assert_eq!(parse("pageSize=0").page_size, 1);
        assert_eq!(parse("pageSize=abc").page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(parse("pageSize=10").page_size, 10);
    }

    #[test]
    fn product_json_uses_client_field_names() {
        let product = Product {
            id: 3,
            name: "Blue Hat".to_string(),
            description: "Wool".to_string(),
            price: Decimal::new(1050, 2),
            picture_url: "images/hat.png".to_string(),
            product_type: "Hats".to_string(),
            brand: "Acme".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["pictureUrl"], "images/hat.png");
        assert_eq!(json["type"], "Hats");
        assert_eq!(json["price"], 10.5);
    }

    #[test]
    fn negative_price_is_rejected() {
        let input: CreateProduct = serde_json::from_value(serde_json::json!({
            "name": "Hat",
            "price": -1.0,
            "type": "Hats",
            "brand": "Acme"
        }))
        .unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn zero_price_is_allowed() {
        let input: CreateProduct = serde_json::from_value(serde_json::json!({
            "name": "Sticker",
            "price": 0,
            "type": "Stickers",
            "brand": "Acme"
        }))
        .unwrap();

        assert!(input.validate().is_ok());
    }
}
