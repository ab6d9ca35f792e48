//! Typed accessors for the users and posts endpoints. They only build addresses and bodies;
//! timeouts, retries and decoding are the gateway's job.

use crate::{
    error::Result,
    gateway::{Gateway, RequestOptions},
};
use postboard_common::model::{
    Deleted, Id,
    post::{CreatePost, Post, PostMarker, UpdatePost},
    user::{CreateUser, UpdateUser, User, UserMarker},
};
use reqwest::Method;

/// Window of a list request. Unset values use the server's defaults.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct ListPage {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl ListPage {
    fn query(self) -> String {
        let pairs: Vec<String> = [("offset", self.offset), ("limit", self.limit)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| format!("{key}={value}")))
            .collect();

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Users<'gateway> {
    gateway: &'gateway Gateway,
}

impl<'gateway> Users<'gateway> {
    pub(crate) fn new(gateway: &'gateway Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(self) -> Result<Vec<User>> {
        self.list_page(ListPage::default()).await
    }

    pub async fn list_page(self, page: ListPage) -> Result<Vec<User>> {
        self.gateway
            .fetch_json(&format!("/users{}", page.query()), RequestOptions::default())
            .await
    }

    pub async fn get(self, id: Id<UserMarker>) -> Result<User> {
        self.gateway
            .fetch_json(&format!("/users/{id}"), RequestOptions::default())
            .await
    }

    pub async fn create(self, user: &CreateUser) -> Result<User> {
        let request = RequestOptions::new(Method::POST).json(user)?;
        self.gateway.fetch_json("/users", request).await
    }

    pub async fn update(self, id: Id<UserMarker>, update: &UpdateUser) -> Result<User> {
        let request = RequestOptions::new(Method::PUT).json(update)?;
        self.gateway
            .fetch_json(&format!("/users/{id}"), request)
            .await
    }

    pub async fn delete(self, id: Id<UserMarker>) -> Result<Deleted> {
        self.gateway
            .fetch_json(&format!("/users/{id}"), RequestOptions::new(Method::DELETE))
            .await
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Posts<'gateway> {
    gateway: &'gateway Gateway,
}

impl<'gateway> Posts<'gateway> {
    pub(crate) fn new(gateway: &'gateway Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(self) -> Result<Vec<Post>> {
        self.list_page(ListPage::default()).await
    }

    pub async fn list_page(self, page: ListPage) -> Result<Vec<Post>> {
        self.gateway
            .fetch_json(&format!("/posts{}", page.query()), RequestOptions::default())
            .await
    }

    pub async fn get(self, id: Id<PostMarker>) -> Result<Post> {
        self.gateway
            .fetch_json(&format!("/posts/{id}"), RequestOptions::default())
            .await
    }

    /// Posts written by `user_id`. Empty if the user has none or doesn't exist.
    pub async fn by_user(self, user_id: Id<UserMarker>) -> Result<Vec<Post>> {
        self.by_user_page(user_id, ListPage::default()).await
    }

    pub async fn by_user_page(self, user_id: Id<UserMarker>, page: ListPage) -> Result<Vec<Post>> {
        self.gateway
            .fetch_json(
                &format!("/posts/user/{user_id}{}", page.query()),
                RequestOptions::default(),
            )
            .await
    }

    pub async fn create(self, post: &CreatePost) -> Result<Post> {
        let request = RequestOptions::new(Method::POST).json(post)?;
        self.gateway.fetch_json("/posts", request).await
    }

    pub async fn update(self, id: Id<PostMarker>, update: &UpdatePost) -> Result<Post> {
        let request = RequestOptions::new(Method::PUT).json(update)?;
        self.gateway
            .fetch_json(&format!("/posts/{id}"), request)
            .await
    }

    pub async fn delete(self, id: Id<PostMarker>) -> Result<Deleted> {
        self.gateway
            .fetch_json(&format!("/posts/{id}"), RequestOptions::new(Method::DELETE))
            .await
    }
}
