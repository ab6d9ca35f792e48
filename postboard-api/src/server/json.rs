use crate::server::ServerError;
use axum::{
    Json as AxumJson,
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use serde::Serialize;

/// Request bodies that fail to parse and response bodies that fail to serialize both turn into
/// a [`ServerError`], so clients always get the `{status, message}` shape.
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumJson), rejection(ServerError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (TypedHeader(ContentType::json()), body).into_response(),
            Err(err) => ServerError::JsonResponse(err).into_response(),
        }
    }
}

/// A freshly stored record, answered with `201 Created`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.0).into_response();
        if response.status().is_success() {
            *response.status_mut() = StatusCode::CREATED;
        }
        response
    }
}
