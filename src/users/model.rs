use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user. The store owns every instance; handlers only ever see
/// clones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
}

/// Request body of create and update.
///
/// Every field is optional at decode time so a missing field surfaces as a
/// validation violation rather than a decode error. A client-supplied `id`
/// is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    #[schema(example = "Ann", max_length = 50)]
    pub first_name: Option<String>,
    #[schema(example = "Lee", max_length = 50)]
    pub last_name: Option<String>,
    #[schema(example = "ann@example.com")]
    pub email: Option<String>,
}

/// [`UserInput`] after validation: every field present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserFields {
    pub(crate) fn into_user(self, id: i32) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

/// The records every fresh store starts with.
pub fn seed() -> Vec<User> {
    vec![
        User {
            id: 1,
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            email: "john@example.com".to_owned(),
        },
        User {
            id: 2,
            first_name: "Jane".to_owned(),
            last_name: "Smith".to_owned(),
            email: "jane@example.com".to_owned(),
        },
    ]
}
