//! Application assembly: routes plus the middleware pipeline.

use std::sync::Arc;

use crate::config::Environment;
use crate::method::Method;
use crate::middleware::{bearer, recover, trace};
use crate::router::Router;
use crate::users::{self, UserStore, UsersApi};

/// Build the service router around `store`.
///
/// Layer order, outermost first: recover, bearer, trace. Every route,
/// including unmatched paths and the API document, sits behind all three.
pub fn build(store: Arc<UserStore>, environment: Environment) -> Router {
    let api = Arc::new(UsersApi {
        store,
        expose_error_details: environment.is_development(),
    });

    let mut router = users::routes(Router::new(), api);
    if environment.is_development() {
        router = router.on(Method::Get, users::docs::PATH, users::docs::openapi_json);
    }

    router
        .layer(recover)
        .layer(bearer)
        .layer(trace)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::request::Request;

    const TOKEN: &str = "Bearer eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbm4ifQ.c2ln";

    fn get(path: &str) -> Request {
        Request::new(Method::Get, path).with_header("authorization", TOKEN)
    }

    fn json_of(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("json body")
    }

    #[tokio::test]
    async fn store_failures_never_leak_in_production() {
        let store = Arc::new(UserStore::seeded());
        store.poison();
        let pipeline = build(store, Environment::Production).into_pipeline();

        // List lets the error escape; recover answers with the generic body.
        let res = pipeline.call(get("/api/users")).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(json_of(res.body()), json!({"error": "Internal server error."}));

        // Get-by-id answers its own 500.
        let res = pipeline.call(get("/api/users/1")).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(json_of(res.body()), json!({"message": "Internal server error."}));
    }

    #[tokio::test]
    async fn development_exposes_get_by_id_details() {
        let store = Arc::new(UserStore::seeded());
        store.poison();
        let pipeline = build(store, Environment::Development).into_pipeline();

        let res = pipeline.call(get("/api/users/2")).await;
        assert_eq!(json_of(res.body())["details"], "user store lock poisoned");
    }
}
