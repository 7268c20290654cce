//! `/api/users` resource handlers.
//!
//! Expected failures (bad id, bad body, unknown user) become responses right
//! here. Store failures travel up as [`Error`] for the recover layer, except
//! on get-by-id, which answers its own `500`.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::model::{User, UserFields, UserInput};
use super::store::{StoreError, UserStore};
use super::validate::{Violation, validate};
use crate::error::Error;
use crate::handler::Handler;
use crate::method::Method;
use crate::request::Request;
use crate::response::{Outcome, Response};
use crate::router::Router;
use crate::status::Status;

pub(crate) const NOT_FOUND: &str = "User not found.";
pub(crate) const DATA_REQUIRED: &str = "User data is required.";
pub(crate) const MALFORMED: &str = "Malformed user data.";
pub(crate) const INTERNAL: &str = "Internal server error.";

/// What the user handlers share.
#[derive(Debug)]
pub struct UsersApi {
    pub store: Arc<UserStore>,
    /// Put internal error text into get-by-id `500` bodies. Development only.
    pub expose_error_details: bool,
}

/// `{"message": …}`, with optional `details`.
#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    #[schema(example = "User not found.")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Message {
    fn new(message: &str) -> Self {
        Self { message: message.to_owned(), details: None }
    }

    fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

/// Register the five user routes on `router`.
pub fn routes(router: Router, api: Arc<UsersApi>) -> Router {
    router
        .on(Method::Get,    "/api/users",      with(&api, list_users))
        .on(Method::Get,    "/api/users/{id}", with(&api, get_user))
        .on(Method::Post,   "/api/users",      with(&api, create_user))
        .on(Method::Put,    "/api/users/{id}", with(&api, update_user))
        .on(Method::Delete, "/api/users/{id}", with(&api, delete_user))
}

fn with<F, Fut>(api: &Arc<UsersApi>, f: F) -> impl Handler + use<F, Fut>
where
    F: Fn(Arc<UsersApi>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    let api = Arc::clone(api);
    move |req: Request| f(Arc::clone(&api), req)
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Missing or unreadable bearer token"),
    ),
    tag = "users",
    operation_id = "getUsers"
)]
pub async fn list_users(api: Arc<UsersApi>, _req: Request) -> Outcome {
    let users = api.store.list()?;
    Response::builder().json_value(&users)
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Id is not an integer", body = Message),
        (status = 401, description = "Missing or unreadable bearer token"),
        (status = 404, description = "No such user", body = Message),
        (status = 500, description = "Store failure", body = Message),
    ),
    tag = "users",
    operation_id = "getUserById"
)]
pub async fn get_user(api: Arc<UsersApi>, req: Request) -> Outcome {
    let id = match path_id(&req) {
        Ok(id) => id,
        Err(rejection) => return rejection.respond(),
    };

    match api.store.get(id) {
        Ok(user) => Response::builder().json_value(&user),
        Err(StoreError::NotFound(_)) => not_found(),
        Err(e) => {
            warn!(id, error = %e, "user lookup failed");
            let mut body = Message::new(INTERNAL);
            if api.expose_error_details {
                body = body.with_details(e.to_string());
            }
            Response::builder()
                .status(Status::InternalServerError)
                .json_value(&body)
        }
    }
}

/// Create a user; the store assigns the id.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserInput,
    responses(
        (status = 201, description = "Created", body = User,
            headers(("location" = String, description = "Path of the new user"))),
        (status = 400, description = "Missing body or field violations", body = [Violation]),
        (status = 401, description = "Missing or unreadable bearer token"),
    ),
    tag = "users",
    operation_id = "createUser"
)]
pub async fn create_user(api: Arc<UsersApi>, req: Request) -> Outcome {
    let fields = match read_fields(&req) {
        Ok(fields) => fields,
        Err(rejection) => return rejection.respond(),
    };

    let user = api.store.insert(fields)?;
    debug!(id = user.id, "user created");
    Response::builder()
        .status(Status::Created)
        .header("location", &format!("/api/users/{}", user.id))
        .json_value(&user)
}

/// Replace every field of a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserInput,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Missing body or field violations", body = [Violation]),
        (status = 401, description = "Missing or unreadable bearer token"),
        (status = 404, description = "No such user", body = Message),
    ),
    tag = "users",
    operation_id = "updateUser"
)]
pub async fn update_user(api: Arc<UsersApi>, req: Request) -> Outcome {
    let id = match path_id(&req) {
        Ok(id) => id,
        Err(rejection) => return rejection.respond(),
    };
    let fields = match read_fields(&req) {
        Ok(fields) => fields,
        Err(rejection) => return rejection.respond(),
    };

    match api.store.replace(id, fields) {
        Ok(_) => Ok(Response::status(Status::NoContent)),
        Err(StoreError::NotFound(_)) => not_found(),
        Err(e) => Err(Error::from(e)),
    }
}

/// Delete a user for good.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Id is not an integer", body = Message),
        (status = 401, description = "Missing or unreadable bearer token"),
        (status = 404, description = "No such user", body = Message),
    ),
    tag = "users",
    operation_id = "deleteUser"
)]
pub async fn delete_user(api: Arc<UsersApi>, req: Request) -> Outcome {
    let id = match path_id(&req) {
        Ok(id) => id,
        Err(rejection) => return rejection.respond(),
    };

    match api.store.delete(id) {
        Ok(_) => Ok(Response::status(Status::NoContent)),
        Err(StoreError::NotFound(_)) => not_found(),
        Err(e) => Err(Error::from(e)),
    }
}

// ── Request parsing ───────────────────────────────────────────────────────────

/// Why a request was refused before reaching the store. Always a `400`.
enum Rejection {
    BadId(String),
    MissingBody,
    Malformed(serde_json::Error),
    Invalid(Vec<Violation>),
}

impl Rejection {
    fn respond(self) -> Outcome {
        let bad_request = Response::builder().status(Status::BadRequest);
        match self {
            Self::BadId(raw) => bad_request
                .json_value(&Message::new(&format!("The value '{raw}' is not valid."))),
            Self::MissingBody => bad_request.json_value(&Message::new(DATA_REQUIRED)),
            Self::Malformed(e) => {
                bad_request.json_value(&Message::new(MALFORMED).with_details(e.to_string()))
            }
            Self::Invalid(violations) => bad_request.json_value(&violations),
        }
    }
}

fn path_id(req: &Request) -> Result<i32, Rejection> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse().map_err(|_| Rejection::BadId(raw.to_owned()))
}

fn read_fields(req: &Request) -> Result<UserFields, Rejection> {
    if req.body().iter().all(u8::is_ascii_whitespace) {
        return Err(Rejection::MissingBody);
    }
    let input: Option<UserInput> =
        serde_json::from_slice(req.body()).map_err(Rejection::Malformed)?;
    let input = input.ok_or(Rejection::MissingBody)?;
    validate(input).map_err(Rejection::Invalid)
}

fn not_found() -> Outcome {
    Response::builder()
        .status(Status::NotFound)
        .json_value(&Message::new(NOT_FOUND))
}
