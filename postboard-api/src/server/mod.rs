use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use json::Json;
use postboard_common::{
    model::{Id, post::PostMarker, user::UserMarker},
    validate::ValidationErrors,
};
use postboard_store::store::{Store, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

mod json;
pub mod pagination;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub store: Arc<Store>,
}

/// The full application: every resource route nested under `/{api_prefix}`, with request
/// tracing. An empty prefix mounts the routes at the root.
pub fn app(store: Arc<Store>, api_prefix: &str) -> Router {
    let api_prefix = api_prefix.trim_matches('/');
    let router = if api_prefix.is_empty() {
        routes::routes()
    } else {
        ServerRouter::new().nest(&format!("/{api_prefix}"), routes::routes())
    };

    router
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { store })
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Query rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Post with id {0} not found")]
    PostByIdNotFound(Id<PostMarker>),
    #[error("User with id {0} not found")]
    UserByIdNotFound(Id<UserMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PostByIdNotFound(_)
            | ServerError::UserByIdNotFound(_) => StatusCode::NOT_FOUND,
            // Ids that aren't non-negative integers
            ServerError::PathRejection(PathRejection::FailedToDeserializePathParams(_))
            | ServerError::QueryRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::PathRejection(_)
            | ServerError::JsonResponse(_)
            | ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}
