use crate::{
    model::{Id, user::UserMarker},
    validate::{self, ValidationErrors},
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id<PostMarker>,
    pub user_id: Id<UserMarker>,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePost {
    pub user_id: Id<UserMarker>,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id<UserMarker>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Post {
    #[must_use]
    pub fn new(id: Id<PostMarker>, create: CreatePost) -> Self {
        Self {
            id,
            user_id: create.user_id,
            title: create.title,
            body: create.body,
        }
    }

    pub fn merge(&mut self, update: UpdatePost) {
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(body) = update.body {
            self.body = body;
        }
    }
}

impl CreatePost {
    #[must_use]
    pub fn new(user_id: Id<UserMarker>, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            body: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate::validate_post(&self.title, Some(&self.body))
    }
}

impl UpdatePost {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Some(title) = &self.title {
            errors.check(validate::is_valid_title(title), validate::Violation::Title);
        }
        if let Some(body) = &self.body {
            errors.check(validate::is_valid_body(body), validate::Violation::Body);
        }

        errors.into_result()
    }
}
