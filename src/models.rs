use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pagination::PaginationResult;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Tag {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(examples("dessert", "vegan"))]
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Category {
    pub id: i32,
    #[schema(examples("Cakes", "Soups"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CategoriesList {
    pub items: Vec<Category>,
}

/// A recipe as shown to readers and authors
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Recipe {
    pub id: i32,
    #[schema(min_length = 6, max_length = 65)]
    pub title: String,
    #[schema(max_length = 165)]
    pub description: String,
    #[schema(examples("carrot-cake"))]
    pub slug: String,

    /// Preparation time with its unit
    #[schema(examples("45 Minutes"))]
    pub preparation: String,
    pub preparation_time: i32,
    pub preparation_time_unit: String,
    pub servings: i32,
    pub servings_unit: String,
    pub preparation_steps: String,
    pub preparation_steps_is_html: bool,

    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Absolute cover URL, empty if the recipe has no cover
    pub cover: String,

    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub tags: Vec<Tag>,
}

/// One page of recipes with the data to render page navigation
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct RecipesList {
    pub recipes: Vec<Recipe>,
    pub pagination: PaginationResult,
    /// Heading of the list, if it is filtered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub bio: String,
}
