use axum::{extract::State, Json};
use axum_macros::debug_handler;
use entity::category::{self, Entity as Categories};
use sea_orm::{EntityTrait, QueryOrder};

use crate::models::{CategoriesList, Category};

use super::{ApiContext, ApiErrors};

/// List categories
///
/// All categories by name, e. g. to fill a category menu or a select box.
#[debug_handler]
#[utoipa::path(
    get,
    path = "/categories",
    operation_id = "listCategories",
    responses(
        (status = OK, description = "All categories", body = CategoriesList),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error"),
    ),
    tag = super::TAG_RECIPES,
)]
pub(crate) async fn api_list_categories(
    State(ctx): State<ApiContext>,
) -> Result<Json<CategoriesList>, ApiErrors> {
    let items = Categories::find()
        .order_by_asc(category::Column::Name)
        .all(ctx.db())
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(Json(CategoriesList { items }))
}
