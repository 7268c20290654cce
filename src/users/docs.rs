//! OpenAPI description of the users API, served in development.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{self, Message};
use super::model::{User, UserInput};
use super::validate::Violation;
use crate::request::Request;
use crate::response::{Outcome, Response};

pub const PATH: &str = "/swagger/v1/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Management API",
        version = "v1",
        description = "A simple API for managing users."
    ),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(schemas(User, UserInput, Violation, Message)),
    modifiers(&BearerScheme),
    security(("bearer" = [])),
    tags((name = "users", description = "User management"))
)]
pub struct ApiDoc;

struct BearerScheme;

impl Modify for BearerScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// `GET /swagger/v1/swagger.json`
pub async fn openapi_json(_req: Request) -> Outcome {
    let doc = ApiDoc::openapi().to_pretty_json()?;
    Ok(Response::json(doc.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_user_operation() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise");
        assert_eq!(doc["info"]["title"], "User Management API");
        let users = &doc["paths"]["/api/users"];
        assert!(users["get"].is_object());
        assert!(users["post"].is_object());
        let by_id = &doc["paths"]["/api/users/{id}"];
        for method in ["get", "put", "delete"] {
            assert!(by_id[method].is_object(), "missing {method}");
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
