use crate::{
    model::Id,
    validate::{self, ValidationErrors},
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(id: Id<UserMarker>, create: CreateUser) -> Self {
        Self {
            id,
            name: create.name,
            username: create.username,
            email: create.email,
        }
    }

    /// Shallow merge: every field present in `update` replaces the stored one.
    pub fn merge(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate::validate_user(&self.name, &self.username, &self.email)
    }
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Some(name) = &self.name {
            errors.check(validate::is_valid_name(name), validate::Violation::Name);
        }
        if let Some(username) = &self.username {
            errors.check(
                validate::is_valid_username(username),
                validate::Violation::Username,
            );
        }
        if let Some(email) = &self.email {
            errors.check(validate::is_valid_email(email), validate::Violation::Email);
        }

        errors.into_result()
    }
}
