use axum::{
    extract::{Path, State},
    Json,
};
use axum_macros::debug_handler;
use entity::tag::Entity as Tags;
use sea_orm::EntityTrait;

use crate::models::Tag;

use super::{ApiContext, ApiErrors};

/// Get tag
#[debug_handler]
#[utoipa::path(
    get,
    path = "/tags/{tag_id}",
    operation_id = "getTagById",
    params(
        ("tag_id" = i32, Path, description = "Id of the tag"),
    ),
    responses(
        (status = OK, description = "Tag data", body = Tag),
        (status = NOT_FOUND, description = "Tag not found"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_read_tag(
    State(ctx): State<ApiContext>,
    Path(tag_id): Path<i32>,
) -> Result<Json<Tag>, ApiErrors> {
    let tag = Tags::find_by_id(tag_id)
        .one(ctx.db())
        .await?
        .ok_or_else(|| ApiErrors::NotFound(format!("Tag {tag_id} not found")))?;
    Ok(Json(tag.into()))
}
