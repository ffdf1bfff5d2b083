use axum::{
    extract::{Path, State},
    Json,
};
use axum_macros::debug_handler;
use entity::recipe;
use sea_orm::{ColumnTrait, QueryFilter, Select};
use tracing::debug;

use crate::{
    axumext::extractors::ValidatedQueryParams,
    models::{Recipe, RecipesList},
};

use super::{
    db::{
        find_tag_by_name, get_category, load_aggregates, matching_text, paginate_recipes,
        published_recipes, recipe_ids_with_tag,
    },
    types::{PageParams, SearchParams},
    ApiContext, ApiErrors,
};

/// Runs `select` for the requested page and renders the list.
pub(crate) async fn recipes_page(
    ctx: &ApiContext,
    select: Select<recipe::Entity>,
    raw_page: Option<&str>,
) -> Result<RecipesList, ApiErrors> {
    let (rows, pagination) = paginate_recipes(ctx.db(), select, raw_page, &ctx.pagination).await?;
    let recipes: Vec<Recipe> = load_aggregates(ctx.db(), rows)
        .await?
        .into_iter()
        .map(|aggregate| aggregate.into_model(ctx.media_url()))
        .collect();
    Ok(RecipesList {
        recipes,
        pagination,
        title: None,
        search_term: None,
    })
}

/// List recipes
///
/// All published recipes, newest first.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/recipes",
    operation_id = "listRecipes",
    params(PageParams),
    responses(
        (status = OK, description = "One page of recipes", body = RecipesList),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_list_recipes(
    State(ctx): State<ApiContext>,
    ValidatedQueryParams(params): ValidatedQueryParams<PageParams>,
) -> Result<Json<RecipesList>, ApiErrors> {
    let list = recipes_page(&ctx, published_recipes(), params.raw_page()).await?;
    Ok(Json(list))
}

/// Search recipes
///
/// Published recipes whose title or description contains the search term,
/// ignoring case.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/recipes/search",
    operation_id = "searchRecipes",
    params(SearchParams),
    responses(
        (status = OK, description = "One page of matching recipes", body = RecipesList),
        (status = NOT_FOUND, description = "No search term given"),
        (status = BAD_REQUEST, description = "Invalid request"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_search_recipes(
    State(ctx): State<ApiContext>,
    ValidatedQueryParams(params): ValidatedQueryParams<SearchParams>,
) -> Result<Json<RecipesList>, ApiErrors> {
    let term = params
        .term()
        .ok_or_else(|| ApiErrors::NotFound("No search term".to_string()))?;
    debug!("Searching recipes for {:?}", term);

    let mut list = recipes_page(
        &ctx,
        matching_text(published_recipes(), term),
        params.page.as_deref(),
    )
    .await?;
    list.title = Some(format!("Looking for \"{term}\""));
    list.search_term = Some(term.to_string());
    Ok(Json(list))
}

/// List recipes of a category
#[debug_handler]
#[utoipa::path(
    get,
    path = "/recipes/category/{category_id}",
    operation_id = "listCategoryRecipes",
    params(
        ("category_id" = i32, Path, description = "Id of the category"),
        PageParams,
    ),
    responses(
        (status = OK, description = "One page of recipes in the category", body = RecipesList),
        (status = NOT_FOUND, description = "Unknown category or no published recipes in it"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_list_category_recipes(
    State(ctx): State<ApiContext>,
    Path(category_id): Path<i32>,
    ValidatedQueryParams(params): ValidatedQueryParams<PageParams>,
) -> Result<Json<RecipesList>, ApiErrors> {
    let category = get_category(ctx.db(), category_id)
        .await?
        .ok_or_else(|| ApiErrors::NotFound(format!("Category {category_id} not found")))?;

    let select = published_recipes().filter(recipe::Column::CategoryId.eq(category_id));
    let mut list = recipes_page(&ctx, select, params.raw_page()).await?;
    if list.recipes.is_empty() {
        return Err(ApiErrors::NotFound(format!(
            "No recipes in category {}",
            category.name
        )));
    }
    list.title = Some(format!("{} - Category", category.name));
    Ok(Json(list))
}

/// List recipes with a tag
#[debug_handler]
#[utoipa::path(
    get,
    path = "/recipes/tag/{tag_name}",
    operation_id = "listTagRecipes",
    params(
        ("tag_name" = String, Path, description = "Name of the tag", max_length = 32),
        PageParams,
    ),
    responses(
        (status = OK, description = "One page of recipes with the tag", body = RecipesList),
        (status = NOT_FOUND, description = "Unknown tag or no published recipes with it"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_list_tag_recipes(
    State(ctx): State<ApiContext>,
    Path(tag_name): Path<String>,
    ValidatedQueryParams(params): ValidatedQueryParams<PageParams>,
) -> Result<Json<RecipesList>, ApiErrors> {
    let tag = find_tag_by_name(ctx.db(), &tag_name)
        .await?
        .ok_or_else(|| ApiErrors::NotFound(format!("Tag {tag_name} not found")))?;
    let recipe_ids = recipe_ids_with_tag(ctx.db(), tag.id).await?;
    if recipe_ids.is_empty() {
        return Err(ApiErrors::NotFound(format!("No recipes with tag {tag_name}")));
    }

    let select = published_recipes().filter(recipe::Column::Id.is_in(recipe_ids));
    let mut list = recipes_page(&ctx, select, params.raw_page()).await?;
    if list.recipes.is_empty() {
        return Err(ApiErrors::NotFound(format!("No recipes with tag {tag_name}")));
    }
    list.title = Some(format!("Tag \"{}\"", tag.name));
    Ok(Json(list))
}
