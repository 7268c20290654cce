//! The `User` resource: model, store, validation, handlers, API document.

pub mod docs;
pub mod handlers;
mod model;
mod store;
mod validate;

pub use handlers::{UsersApi, routes};
pub use model::{User, UserFields, UserInput, seed};
pub use store::{StoreError, UserStore};
pub use validate::{Violation, validate};
