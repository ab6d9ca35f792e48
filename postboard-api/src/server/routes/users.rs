use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Created, Json},
    pagination::{Page, PageQuery},
};
use axum::extract::{Query, State, rejection::QueryRejection};
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Deleted, Id,
    user::{CreateUser, UpdateUser, User, UserMarker},
};
use postboard_store::store::Store;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_users)
        .typed_post(create_user)
        .typed_get(get_user)
        .typed_put(update_user)
        .typed_delete(delete_user)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users", rejection(ServerError))]
struct UsersPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}", rejection(ServerError))]
struct UserPath {
    id: Id<UserMarker>,
}

async fn list_users(
    UsersPath(): UsersPath,
    State(store): State<Arc<Store>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<User>>> {
    let Query(query) = query?;
    let users = store.fetch_users()?;

    Ok(Json(Page::from(query).apply(users)))
}

async fn create_user(
    UsersPath(): UsersPath,
    State(store): State<Arc<Store>>,
    Json(user): Json<CreateUser>,
) -> Result<Created<User>> {
    user.validate()?;
    let user = store.create_user(user)?;

    Ok(Created(user))
}

async fn get_user(
    UserPath { id }: UserPath,
    State(store): State<Arc<Store>>,
) -> Result<Json<User>> {
    let user = store
        .fetch_user(id)?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    Ok(Json(user))
}

async fn update_user(
    UserPath { id }: UserPath,
    State(store): State<Arc<Store>>,
    Json(update): Json<UpdateUser>,
) -> Result<Json<User>> {
    update.validate()?;
    let user = store
        .update_user(id, update)?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    Ok(Json(user))
}

async fn delete_user(
    UserPath { id }: UserPath,
    State(store): State<Arc<Store>>,
) -> Result<Json<Deleted>> {
    if !store.delete_user(id)? {
        return Err(ServerError::UserByIdNotFound(id));
    }

    Ok(Json(Deleted::new()))
}
