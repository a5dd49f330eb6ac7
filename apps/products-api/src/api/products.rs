//! Products API routes

use axum::Router;
use domain_products::{ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    handlers::router(ProductService::new(state.db.clone()))
}
