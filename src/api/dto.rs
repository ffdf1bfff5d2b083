use typed_builder::TypedBuilder;

use crate::models;

/// A recipe row together with the rows it refers to.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct RecipeAggregate {
    recipe: entity::recipe::Model,
    #[builder(default)]
    category: Option<entity::category::Model>,
    #[builder(default)]
    author: Option<entity::author::Model>,
    #[builder(default)]
    tags: Vec<entity::tag::Model>,
}

impl RecipeAggregate {
    pub fn recipe(&self) -> &entity::recipe::Model {
        &self.recipe
    }

    pub fn into_model(self, media_url: &str) -> models::Recipe {
        let recipe = self.recipe;
        models::Recipe {
            id: recipe.id,
            preparation: format!(
                "{} {}",
                recipe.preparation_time, recipe.preparation_time_unit
            ),
            cover: cover_url(media_url, &recipe.cover),
            category_name: self.category.map(|c| c.name),
            author_name: self
                .author
                .as_ref()
                .map(|a| a.display_name())
                .unwrap_or_default(),
            tags: self.tags.into_iter().map(models::Tag::from).collect(),
            title: recipe.title,
            description: recipe.description,
            slug: recipe.slug,
            preparation_time: recipe.preparation_time,
            preparation_time_unit: recipe.preparation_time_unit,
            servings: recipe.servings,
            servings_unit: recipe.servings_unit,
            preparation_steps: recipe.preparation_steps,
            preparation_steps_is_html: recipe.preparation_steps_is_html,
            is_published: recipe.is_published,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            category_id: recipe.category_id,
            author_id: recipe.author_id,
        }
    }
}

/// Absolute location of a cover below `media_url`, empty without a cover.
pub fn cover_url(media_url: &str, cover: &str) -> String {
    let cover = cover.trim_start_matches('/');
    if cover.is_empty() {
        String::new()
    } else {
        format!("{media_url}{cover}")
    }
}

impl From<entity::tag::Model> for models::Tag {
    fn from(model: entity::tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

impl From<entity::category::Model> for models::Category {
    fn from(model: entity::category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<entity::author::Model> for models::AuthorProfile {
    fn from(model: entity::author::Model) -> Self {
        Self {
            id: model.id,
            name: model.display_name(),
            username: model.username,
            bio: model.bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;

    fn recipe_row(id: i32) -> entity::recipe::Model {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        entity::recipe::Model {
            id,
            title: format!("Recipe number {id}"),
            description: "A description".to_string(),
            slug: format!("recipe-number-{id}"),
            preparation_time: 10,
            preparation_time_unit: "Minutes".to_string(),
            servings: 5,
            servings_unit: "Portions".to_string(),
            preparation_steps: "Steps".to_string(),
            preparation_steps_is_html: false,
            created_at: ts,
            updated_at: ts,
            is_published: true,
            cover: String::new(),
            category_id: Some(1),
            author_id: None,
        }
    }

    #[test]
    fn cover_url_joins_media_url() {
        assert_eq!(
            cover_url("/media/", "recipes/cover/2024/03/01/cake.jpg"),
            "/media/recipes/cover/2024/03/01/cake.jpg"
        );
        assert_eq!(cover_url("https://cdn.example.com/m/", "/a.png"), "https://cdn.example.com/m/a.png");
        assert_eq!(cover_url("/media/", ""), "");
    }

    #[test]
    fn aggregate_into_model() {
        // Arrange
        let author_id = Uuid::new_v4();
        let aggregate = RecipeAggregate::builder()
            .recipe(entity::recipe::Model {
                cover: "recipes/cover/cake.jpg".to_string(),
                author_id: Some(author_id),
                ..recipe_row(7)
            })
            .category(Some(entity::category::Model {
                id: 1,
                name: "Cakes".to_string(),
            }))
            .author(Some(entity::author::Model {
                id: author_id,
                username: "maria".to_string(),
                first_name: "Maria".to_string(),
                last_name: "Silva".to_string(),
                email: "maria@example.com".to_string(),
                bio: String::new(),
            }))
            .tags(vec![entity::tag::Model {
                id: 3,
                name: "dessert".to_string(),
                slug: "dessert".to_string(),
            }])
            .build();

        // Act
        let model = aggregate.into_model("/media/");

        // Assert
        assert_eq!(model.id, 7);
        assert_eq!(model.preparation, "10 Minutes");
        assert_eq!(model.cover, "/media/recipes/cover/cake.jpg");
        assert_eq!(model.category_name.as_deref(), Some("Cakes"));
        assert_eq!(model.author_name, "Maria Silva");
        assert_eq!(model.author_id, Some(author_id));
        assert_eq!(model.tags.len(), 1);
        assert_eq!(model.tags[0].name, "dessert");
    }

    #[test]
    fn aggregate_without_relations() {
        let model = RecipeAggregate::builder()
            .recipe(entity::recipe::Model {
                category_id: None,
                ..recipe_row(1)
            })
            .build()
            .into_model("/media/");
        assert_eq!(model.category_name, None);
        assert_eq!(model.author_name, "");
        assert_eq!(model.cover, "");
        assert!(model.tags.is_empty());
    }
}
