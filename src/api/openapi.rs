//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::PathItemType;
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, product_handler, user_handler};
use crate::api::routes;
use crate::domain::{Gender, ProductResponse, UserDetail, UserState};
use crate::services::TokenResponse;
use crate::types::{PaginationMeta, ProductPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Skeleton",
        version = "0.1.0",
        description = "Starter HTTP API: axum, SeaORM, JWT auth and a cron scheduler",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        routes::index,
        routes::health,
        auth_handler::login,
        auth_handler::register,
        user_handler::get_current_user,
        user_handler::update_current_user,
        product_handler::list_products,
        product_handler::create_product,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
    ),
    components(
        schemas(
            Gender,
            UserState,
            UserDetail,
            ProductResponse,
            ProductPage,
            PaginationMeta,
            TokenResponse,
            routes::HealthResponse,
            auth_handler::LoginRequest,
            auth_handler::RegisterRequest,
            user_handler::UpdateProfileRequest,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Index and health check"),
        (name = "Authentication", description = "Login and registration"),
        (name = "Users", description = "Current user profile"),
        (name = "Products", description = "Example CRUD resource")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

fn method_name(method: &PathItemType) -> &'static str {
    match method {
        PathItemType::Get => "GET",
        PathItemType::Post => "POST",
        PathItemType::Put => "PUT",
        PathItemType::Delete => "DELETE",
        PathItemType::Options => "OPTIONS",
        PathItemType::Head => "HEAD",
        PathItemType::Patch => "PATCH",
        PathItemType::Trace => "TRACE",
        PathItemType::Connect => "CONNECT",
    }
}

/// `(METHOD, path, operation id)` for every documented route, sorted by path.
pub fn route_table() -> Vec<(String, String, String)> {
    let doc = ApiDoc::openapi();
    let mut table = Vec::new();

    for (path, item) in doc.paths.paths.iter() {
        for (method, operation) in item.operations.iter() {
            let method = method_name(method).to_string();
            let operation_id = operation.operation_id.clone().unwrap_or_default();
            table.push((method, path.clone(), operation_id));
        }
    }

    table.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    table
}
