use axum::{
    extract::{Path, State},
    Json,
};
use axum_macros::debug_handler;

use crate::models::Recipe;

use super::{
    db::{get_published_recipe, load_aggregate},
    ApiContext, ApiErrors,
};

/// Get recipe
///
/// Read a published recipe with its category, author and tags.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/recipes/{recipe_id}",
    operation_id = "getRecipeById",
    params(
        ("recipe_id" = i32, Path, description = "Id of the recipe"),
    ),
    responses(
        (status = OK, description = "Recipe data", body = Recipe),
        (status = NOT_FOUND, description = "Recipe not found or not published"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_read_recipe(
    State(ctx): State<ApiContext>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<Recipe>, ApiErrors> {
    let recipe = get_published_recipe(ctx.db(), recipe_id)
        .await?
        .ok_or_else(|| ApiErrors::NotFound(format!("Recipe {recipe_id} not found")))?;
    let aggregate = load_aggregate(ctx.db(), recipe).await?;
    Ok(Json(aggregate.into_model(ctx.media_url())))
}
