use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Created, Json},
    pagination::{Page, PageQuery},
};
use axum::extract::{Query, State, rejection::QueryRejection};
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Deleted, Id,
    post::{CreatePost, Post, PostMarker, UpdatePost},
    user::UserMarker,
};
use postboard_store::store::Store;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_user_posts)
        .typed_get(get_post)
        .typed_put(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/user/{user_id}", rejection(ServerError))]
struct UserPostsPath {
    user_id: Id<UserMarker>,
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(store): State<Arc<Store>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Post>>> {
    let Query(query) = query?;
    let posts = store.fetch_posts()?;

    Ok(Json(Page::from(query).apply(posts)))
}

async fn get_user_posts(
    UserPostsPath { user_id }: UserPostsPath,
    State(store): State<Arc<Store>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Post>>> {
    let Query(query) = query?;
    let posts = store.fetch_user_posts(user_id)?;

    Ok(Json(Page::from(query).apply(posts)))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(store): State<Arc<Store>>,
    Json(post): Json<CreatePost>,
) -> Result<Created<Post>> {
    post.validate()?;
    let post = store.create_post(post)?;

    Ok(Created(post))
}

async fn get_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<Store>>,
) -> Result<Json<Post>> {
    let post = store
        .fetch_post(id)?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<Store>>,
    Json(update): Json<UpdatePost>,
) -> Result<Json<Post>> {
    update.validate()?;
    let post = store
        .update_post(id, update)?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(store): State<Arc<Store>>,
) -> Result<Json<Deleted>> {
    if !store.delete_post(id)? {
        return Err(ServerError::PostByIdNotFound(id));
    }

    Ok(Json(Deleted::new()))
}
