use axum::{
    extract::{Path, State},
    Json,
};
use axum_macros::debug_handler;
use entity::author::Entity as Authors;
use sea_orm::{prelude::Uuid, EntityTrait};

use crate::models::AuthorProfile;

use super::{ApiContext, ApiErrors};

/// Get author
///
/// Public profile of a recipe author.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/authors/{author_id}",
    operation_id = "getAuthorById",
    params(
        ("author_id" = String, Path, description = "UUID of the author", format = Uuid),
    ),
    responses(
        (status = OK, description = "Author profile", body = AuthorProfile),
        (status = BAD_REQUEST, description = "Invalid uuid"),
        (status = NOT_FOUND, description = "Author not found"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_read_author(
    State(ctx): State<ApiContext>,
    Path(author_id): Path<String>,
) -> Result<Json<AuthorProfile>, ApiErrors> {
    let author_uuid = Uuid::parse_str(&author_id)
        .map_err(|_| ApiErrors::BadRequest("Invalid uuid".to_string()))?;
    let author = Authors::find_by_id(author_uuid)
        .one(ctx.db())
        .await?
        .ok_or_else(|| ApiErrors::NotFound(format!("Author {author_id} not found")))?;
    Ok(Json(author.into()))
}
