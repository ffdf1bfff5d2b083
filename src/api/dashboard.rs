use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_macros::debug_handler;
use chrono::Utc;
use entity::{author, recipe};
use jwt_authorizer::JwtClaims;
use sea_orm::{ActiveModelTrait, ModelTrait, Set, TransactionTrait};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::models::{AuthorProfile, Recipe, RecipesList};

use super::{
    auth::User,
    db::{
        author_drafts, category_exists, get_author_draft, load_aggregate, save_recipe,
        upsert_author,
    },
    list_recipes::recipes_page,
    profile_form::ProfileForm,
    recipe_form::RecipeForm,
    types::PageParams,
    ApiContext, ApiErrors,
};
use crate::axumext::extractors::ValidatedQueryParams;

async fn checked_form(ctx: &ApiContext, form: RecipeForm) -> Result<RecipeForm, ApiErrors> {
    let form = form.clean()?;
    if let Some(category_id) = form.category_id {
        if !category_exists(ctx.db(), category_id).await? {
            return Err(RecipeForm::unknown_category().into());
        }
    }
    Ok(form)
}

async fn owned_draft(
    ctx: &ApiContext,
    user: &User,
    recipe_id: i32,
) -> Result<recipe::Model, ApiErrors> {
    let author_id = user.author_id()?;
    get_author_draft(ctx.db(), author_id, recipe_id)
        .await?
        .ok_or_else(|| {
            debug!("Recipe {} is no draft of {}", recipe_id, user.name_and_sub());
            ApiErrors::NotFound(format!("Recipe {recipe_id} not found"))
        })
}

/// List drafts
///
/// The caller's unpublished recipes, newest first.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/dashboard/recipes",
    operation_id = "listDrafts",
    params(PageParams),
    responses(
        (status = OK, description = "One page of drafts", body = RecipesList),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_list_drafts(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    ValidatedQueryParams(params): ValidatedQueryParams<PageParams>,
) -> Result<Json<RecipesList>, ApiErrors> {
    let author = upsert_author(ctx.db(), &user).await?;
    let mut list = recipes_page(&ctx, author_drafts(author.id), params.raw_page()).await?;
    list.title = Some("Dashboard".to_string());
    Ok(Json(list))
}

/// Create draft
///
/// Store a new unpublished recipe of the caller.
#[debug_handler]
#[utoipa::path(
    post,
    path = "/dashboard/recipes",
    operation_id = "createDraft",
    request_body = RecipeForm,
    responses(
        (status = CREATED, description = "Draft created", body = Recipe),
        (status = BAD_REQUEST, description = "Invalid form data or duplicate title"),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_create_draft(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Json(form): Json<RecipeForm>,
) -> Result<(StatusCode, Json<Recipe>), ApiErrors> {
    let form = checked_form(&ctx, form).await?;
    let author = upsert_author(ctx.db(), &user).await?;

    let txn = ctx.db().begin().await?;
    let recipe = save_recipe(&txn, author.id, None, form).await?;
    let aggregate = load_aggregate(&txn, recipe).await?;
    txn.commit().await?;

    info!(
        "Recipe {} created by {}",
        aggregate.recipe().id,
        user.name_and_sub()
    );
    Ok((
        StatusCode::CREATED,
        Json(aggregate.into_model(ctx.media_url())),
    ))
}

/// Get draft
#[debug_handler]
#[utoipa::path(
    get,
    path = "/dashboard/recipes/{recipe_id}",
    operation_id = "getDraftById",
    params(
        ("recipe_id" = i32, Path, description = "Id of the recipe"),
    ),
    responses(
        (status = OK, description = "Draft data", body = Recipe),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = NOT_FOUND, description = "No draft of the caller with this id"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_read_draft(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<Recipe>, ApiErrors> {
    let draft = owned_draft(&ctx, &user, recipe_id).await?;
    let aggregate = load_aggregate(ctx.db(), draft).await?;
    Ok(Json(aggregate.into_model(ctx.media_url())))
}

/// Update draft
///
/// Replace the data of an unpublished recipe. The slug is kept.
#[debug_handler]
#[utoipa::path(
    put,
    path = "/dashboard/recipes/{recipe_id}",
    operation_id = "updateDraft",
    params(
        ("recipe_id" = i32, Path, description = "Id of the recipe"),
    ),
    request_body = RecipeForm,
    responses(
        (status = OK, description = "Draft updated", body = Recipe),
        (status = BAD_REQUEST, description = "Invalid form data or duplicate title"),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = NOT_FOUND, description = "No draft of the caller with this id"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_update_draft(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Path(recipe_id): Path<i32>,
    Json(form): Json<RecipeForm>,
) -> Result<Json<Recipe>, ApiErrors> {
    let draft = owned_draft(&ctx, &user, recipe_id).await?;
    let form = checked_form(&ctx, form).await?;

    let txn = ctx.db().begin().await?;
    let author_id = user.author_id()?;
    let recipe = save_recipe(&txn, author_id, Some(draft), form).await?;
    let aggregate = load_aggregate(&txn, recipe).await?;
    txn.commit().await?;

    debug!("Recipe {} updated by {}", recipe_id, user.name_and_sub());
    Ok(Json(aggregate.into_model(ctx.media_url())))
}

/// Delete draft
#[debug_handler]
#[utoipa::path(
    delete,
    path = "/dashboard/recipes/{recipe_id}",
    operation_id = "deleteDraft",
    params(
        ("recipe_id" = i32, Path, description = "Id of the recipe"),
    ),
    responses(
        (status = NO_CONTENT, description = "Draft deleted"),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = NOT_FOUND, description = "No draft of the caller with this id"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_delete_draft(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiErrors> {
    let draft = owned_draft(&ctx, &user, recipe_id).await?;
    draft.delete(ctx.db()).await?;
    info!("Recipe {} deleted by {}", recipe_id, user.name_and_sub());
    Ok(StatusCode::NO_CONTENT)
}

/// Publish draft
///
/// Make an unpublished recipe of the caller visible to everyone.
#[debug_handler]
#[utoipa::path(
    post,
    path = "/dashboard/recipes/{recipe_id}/publish",
    operation_id = "publishDraft",
    params(
        ("recipe_id" = i32, Path, description = "Id of the recipe"),
    ),
    responses(
        (status = OK, description = "Recipe published", body = Recipe),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = NOT_FOUND, description = "No draft of the caller with this id"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_publish_draft(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<Recipe>, ApiErrors> {
    let draft = owned_draft(&ctx, &user, recipe_id).await?;
    let mut row: recipe::ActiveModel = draft.into();
    row.is_published = Set(true);
    row.updated_at = Set(Utc::now());
    let recipe = row.update(ctx.db()).await?;
    info!("Recipe {} published by {}", recipe_id, user.name_and_sub());

    let aggregate = load_aggregate(ctx.db(), recipe).await?;
    Ok(Json(aggregate.into_model(ctx.media_url())))
}

/// Update profile
///
/// Change the biography of the caller.
#[debug_handler]
#[utoipa::path(
    put,
    path = "/dashboard/profile",
    operation_id = "updateProfile",
    request_body = ProfileForm,
    responses(
        (status = OK, description = "Profile updated", body = AuthorProfile),
        (status = BAD_REQUEST, description = "Invalid form data"),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_DASHBOARD,
)]
pub(crate) async fn api_update_profile(
    State(ctx): State<ApiContext>,
    JwtClaims(user): JwtClaims<User>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<AuthorProfile>, ApiErrors> {
    if let Err(err) = form.validate() {
        warn!("Invalid profile of {}", user.name_and_sub());
        return Err(err.into());
    }
    let author = upsert_author(ctx.db(), &user).await?;
    let mut row: author::ActiveModel = author.into();
    row.bio = Set(form.bio.trim().to_string());
    let author = row.update(ctx.db()).await?;
    Ok(Json(author.into()))
}
