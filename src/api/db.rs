use std::collections::HashMap;

use chrono::Utc;
use entity::{
    author, category,
    recipe::{self, Entity as Recipes},
    recipe_tag, tag,
};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use sea_query::{Expr, Func};
use tracing::{debug, info};
use uuid::Uuid;

use super::{auth::User, dto::RecipeAggregate, recipe_form::RecipeForm, ApiErrors};
use crate::{
    pagination::{
        build_pagination_range, resolve_page, PageRange, PaginationConfig, PaginationResult,
    },
    slug::slugify,
};

/// Published recipes, newest first.
pub(crate) fn published_recipes() -> Select<Recipes> {
    Recipes::find()
        .filter(recipe::Column::IsPublished.eq(true))
        .order_by_desc(recipe::Column::Id)
}

/// Unpublished recipes of one author, newest first.
pub(crate) fn author_drafts(author_id: Uuid) -> Select<Recipes> {
    Recipes::find()
        .filter(recipe::Column::IsPublished.eq(false))
        .filter(recipe::Column::AuthorId.eq(author_id))
        .order_by_desc(recipe::Column::Id)
}

/// Case-insensitive match on title or description.
pub(crate) fn matching_text(select: Select<Recipes>, term: &str) -> Select<Recipes> {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    select.filter(
        Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(recipe::Column::Title))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(Expr::col(recipe::Column::Description))).like(pattern)),
    )
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Fetches the requested page of `select` and the navigation window for it.
/// Requests outside the page range are clamped to the nearest page.
pub(crate) async fn paginate_recipes(
    db: &DatabaseConnection,
    select: Select<Recipes>,
    raw_page: Option<&str>,
    config: &PaginationConfig,
) -> Result<(Vec<recipe::Model>, PaginationResult), DbErr> {
    let paginator = select.paginate(db, config.per_page());
    let item_count = paginator.num_items().await?;
    let page_range = PageRange::for_items(item_count, config.per_page());
    let page = page_range.clamp(resolve_page(raw_page));
    let items = if page_range.is_empty() {
        vec![]
    } else {
        paginator.fetch_page(page.index()).await?
    };
    debug!(
        "Page {} of {} with {} recipes",
        page.get(),
        page_range.len(),
        items.len()
    );
    Ok((
        items,
        build_pagination_range(page_range, config.window_size(), page),
    ))
}

/// Loads category, author and tags of each recipe, keeping the order.
pub(crate) async fn load_aggregates<C: ConnectionTrait>(
    db: &C,
    recipes: Vec<recipe::Model>,
) -> Result<Vec<RecipeAggregate>, DbErr> {
    if recipes.is_empty() {
        return Ok(vec![]);
    }

    let mut category_ids: Vec<i32> = recipes.iter().filter_map(|r| r.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();
    let categories: HashMap<i32, category::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let mut author_ids: Vec<Uuid> = recipes.iter().filter_map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors: HashMap<Uuid, author::Model> = if author_ids.is_empty() {
        HashMap::new()
    } else {
        author::Entity::find()
            .filter(author::Column::Id.is_in(author_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    };

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let links = recipe_tag::Entity::find()
        .filter(recipe_tag::Column::RecipeId.is_in(recipe_ids))
        .all(db)
        .await?;
    let mut tag_ids: Vec<i32> = links.iter().map(|l| l.tag_id).collect();
    tag_ids.sort_unstable();
    tag_ids.dedup();
    let tags: HashMap<i32, tag::Model> = if tag_ids.is_empty() {
        HashMap::new()
    } else {
        tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };
    let mut tags_by_recipe: HashMap<i32, Vec<tag::Model>> = HashMap::new();
    for link in links {
        if let Some(tag) = tags.get(&link.tag_id) {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag.clone());
        }
    }

    Ok(recipes
        .into_iter()
        .map(|recipe| {
            let mut recipe_tags = tags_by_recipe.remove(&recipe.id).unwrap_or_default();
            recipe_tags.sort_by(|a, b| a.name.cmp(&b.name));
            RecipeAggregate::builder()
                .category(recipe.category_id.and_then(|id| categories.get(&id).cloned()))
                .author(recipe.author_id.and_then(|id| authors.get(&id).cloned()))
                .tags(recipe_tags)
                .recipe(recipe)
                .build()
        })
        .collect())
}

pub(crate) async fn load_aggregate<C: ConnectionTrait>(
    db: &C,
    recipe: recipe::Model,
) -> Result<RecipeAggregate, DbErr> {
    let id = recipe.id;
    load_aggregates(db, vec![recipe])
        .await?
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound(format!("Recipe {id} not found")))
}

pub(crate) async fn get_published_recipe(
    db: &DatabaseConnection,
    recipe_id: i32,
) -> Result<Option<recipe::Model>, DbErr> {
    Recipes::find_by_id(recipe_id)
        .filter(recipe::Column::IsPublished.eq(true))
        .one(db)
        .await
}

/// An unpublished recipe, if it belongs to the author.
pub(crate) async fn get_author_draft<C: ConnectionTrait>(
    db: &C,
    author_id: Uuid,
    recipe_id: i32,
) -> Result<Option<recipe::Model>, DbErr> {
    author_drafts(author_id)
        .filter(recipe::Column::Id.eq(recipe_id))
        .one(db)
        .await
}

pub(crate) async fn get_category(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<Option<category::Model>, DbErr> {
    category::Entity::find_by_id(category_id).one(db).await
}

pub(crate) async fn find_tag_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<tag::Model>, DbErr> {
    tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await
}

/// Ids of all recipes linked to the tag.
pub(crate) async fn recipe_ids_with_tag(
    db: &DatabaseConnection,
    tag_id: i32,
) -> Result<Vec<i32>, DbErr> {
    Ok(recipe_tag::Entity::find()
        .filter(recipe_tag::Column::TagId.eq(tag_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.recipe_id)
        .collect())
}

/// Creates the author row for the caller or refreshes it from the token.
pub(crate) async fn upsert_author(
    db: &DatabaseConnection,
    user: &User,
) -> Result<author::Model, ApiErrors> {
    let author_id = user.author_id()?;
    let row = author::ActiveModel {
        id: Set(author_id),
        username: Set(user.preferred_username()),
        first_name: Set(user.given_name().to_string()),
        last_name: Set(user.family_name().to_string()),
        email: Set(user.email().to_string()),
        bio: Set(String::new()),
    };
    author::Entity::insert(row)
        .on_conflict(
            OnConflict::column(author::Column::Id)
                .update_columns([
                    author::Column::Username,
                    author::Column::FirstName,
                    author::Column::LastName,
                    author::Column::Email,
                ])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
        .map_err(ApiErrors::from)
}

/// Inserts (`existing` is `None`) or updates an unpublished recipe and
/// replaces its tags.
pub(crate) async fn save_recipe(
    txn: &DatabaseTransaction,
    author_id: Uuid,
    existing: Option<recipe::Model>,
    form: RecipeForm,
) -> Result<recipe::Model, DbErr> {
    let now = Utc::now();
    let is_new = existing.is_none();
    let mut row: recipe::ActiveModel = match existing {
        Some(recipe) => recipe.into(),
        None => recipe::ActiveModel {
            slug: Set(slugify(&form.title)),
            created_at: Set(now),
            author_id: Set(Some(author_id)),
            ..Default::default()
        },
    };
    row.title = Set(form.title);
    row.description = Set(form.description);
    row.preparation_time = Set(form.preparation_time.unwrap_or_default());
    row.preparation_time_unit = Set(form.preparation_time_unit);
    row.servings = Set(form.servings.unwrap_or_default());
    row.servings_unit = Set(form.servings_unit);
    row.preparation_steps = Set(form.preparation_steps);
    row.preparation_steps_is_html = Set(false);
    row.is_published = Set(false);
    row.cover = Set(form.cover.unwrap_or_default());
    row.category_id = Set(form.category_id);
    row.updated_at = Set(now);

    let recipe = if is_new {
        row.insert(txn).await?
    } else {
        row.update(txn).await?
    };
    replace_recipe_tags(txn, recipe.id, &form.tags).await?;
    Ok(recipe)
}

async fn replace_recipe_tags(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    names: &[String],
) -> Result<(), DbErr> {
    recipe_tag::Entity::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;

    for name in names {
        let slug = slugify(name);
        let tag = match tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug.as_str()))
            .one(txn)
            .await?
        {
            Some(tag) => tag,
            None => {
                info!("Creating tag {}", name);
                tag::ActiveModel {
                    name: Set(name.clone()),
                    slug: Set(slug),
                    ..Default::default()
                }
                .insert(txn)
                .await?
            }
        };
        recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag.id),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

pub(crate) async fn category_exists(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<bool, DbErr> {
    Ok(category::Entity::find_by_id(category_id)
        .one(db)
        .await?
        .is_some())
}
