//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use test_utils::TestDatabase;
    use tower::ServiceExt;

    fn state(db: &TestDatabase) -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::new(db.connection_string.clone()),
                server: ServerConfig::default(),
                environment: Environment::Development,
                run_migrations: false,
            },
            db: db.connection(),
        }
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ready_reports_connected_database() {
        let db = TestDatabase::new().await;
        let app = routes(&state(&db));

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["database"], "connected");
        assert!(body["databaseLatencyMs"].is_u64());
    }

    #[tokio::test]
    async fn ready_is_503_once_the_pool_is_closed() {
        let db = TestDatabase::new().await;
        let app = routes(&state(&db));
        db.connection().close().await.unwrap();

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json(response).await;
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
        assert!(body["databaseLatencyMs"].is_u64());
    }

    #[tokio::test]
    async fn products_are_nested() {
        let db = TestDatabase::new().await;
        let app = routes(&state(&db));

        let response = app
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["totalCount"], 0);
        assert_eq!(body["pageIndex"], 1);
        assert_eq!(body["pageSize"], 6);
    }
}
