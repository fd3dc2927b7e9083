use axum::{middleware, routing::get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::Provider;
use crate::api::handlers::{auth_routes, product_routes, user_routes};
use crate::api::middleware::auth_middleware;
use crate::api::openapi::{route_table, ApiDoc};
use crate::api::routes::{health, index};
use crate::api::AppState;

/// Mounts the feature routers under `/api` plus index, health and docs.
pub struct RouteProvider;

impl Provider for RouteProvider {
    fn name(&self) -> &'static str {
        "RouteProvider"
    }

    fn register(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        let api = Router::new()
            .nest("/auth", auth_routes())
            .nest(
                "/user",
                user_routes().route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
            )
            .nest(
                "/products",
                product_routes().route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
            );

        if state.config.debug {
            for (method, path, operation_id) in route_table() {
                tracing::info!("route {:<7} {:<28} {}", method, path, operation_id);
            }
        }

        router
            .route("/", get(index))
            .route("/health", get(health))
            .nest("/api", api)
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }
}
