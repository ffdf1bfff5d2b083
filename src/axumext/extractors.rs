use std::ops::Deref;

use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum::{Json, RequestPartsExt};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use validator::Validate;

use crate::api::recipe_form::field_messages;

/// Query string parameters, deserialized and validated.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ValidatedQueryParams<T>(pub T);

fn map_rejection(err: QueryRejection) -> Response {
    debug!("Query string rejected: {}", err);
    let message = match err {
        QueryRejection::FailedToDeserializeQueryString(inner) => {
            format!("Failed to parse query string: {}", inner.body_text())
        }
        other => other.body_text(),
    };
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQueryParams<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = parts.extract::<Query<T>>().await.map_err(map_rejection)?;
        match query.validate() {
            Ok(()) => Ok(ValidatedQueryParams(query)),
            Err(err) => Err((StatusCode::BAD_REQUEST, Json(field_messages(&err))).into_response()),
        }
    }
}

impl<T> Deref for ValidatedQueryParams<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
