//! Tests for the public REST endpoints against a mocked database

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use recipes::{
    api::{public_routes, ApiContext},
    pagination::PaginationConfig,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use serde_json::Value as Json;
use tower::ServiceExt;

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

fn recipe_row(id: i32) -> entity::recipe::Model {
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    entity::recipe::Model {
        id,
        title: format!("Carrot cake {id}"),
        description: "Fluffy cake with chocolate topping".to_string(),
        slug: format!("carrot-cake-{id}"),
        preparation_time: 45,
        preparation_time_unit: "Minutes".to_string(),
        servings: 8,
        servings_unit: "Pieces".to_string(),
        preparation_steps: "Mix everything and bake.".to_string(),
        preparation_steps_is_html: false,
        created_at: ts,
        updated_at: ts,
        is_published: true,
        cover: "recipes/cover/cake.jpg".to_string(),
        category_id: Some(2),
        author_id: None,
    }
}

/// Create test router
fn create_test_router(db: DatabaseConnection) -> Router {
    Router::new().nest(
        "/api",
        public_routes().with_state(ApiContext::new(db, PaginationConfig::default(), "/media/")),
    )
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_list_recipes_without_any_recipe() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/recipes?page=3").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["recipes"], serde_json::json!([]));
    assert_eq!(json["pagination"]["total_pages"], 0);
    assert_eq!(json["pagination"]["current_page"], 1);
    assert_eq!(json["pagination"]["window"], serde_json::json!([]));
    assert_eq!(json.get("title"), None);
}

#[tokio::test]
async fn test_list_recipes_clamps_page_and_loads_relations() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)]])
        .append_query_results([vec![recipe_row(11)]])
        .append_query_results([vec![entity::category::Model {
            id: 2,
            name: "Cakes".to_string(),
        }]])
        .append_query_results([Vec::<entity::recipe_tag::Model>::new()])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/recipes?page=99").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    let recipe = &json["recipes"][0];
    assert_eq!(recipe["id"], 11);
    assert_eq!(recipe["category_name"], "Cakes");
    assert_eq!(recipe["cover"], "/media/recipes/cover/cake.jpg");
    assert_eq!(recipe["preparation"], "45 Minutes");
    assert_eq!(json["pagination"]["current_page"], 1);
    assert_eq!(json["pagination"]["window"], serde_json::json!([1]));
    assert_eq!(json["pagination"]["has_hidden_pages_before"], false);
    assert_eq!(json["pagination"]["has_hidden_pages_after"], false);
}

#[tokio::test]
async fn test_search_without_term_is_not_found() {
    let (status, _) = get(create_test_router(empty_db()), "/api/recipes/search?q=++").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(create_test_router(empty_db()), "/api/recipes/search").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_sets_title() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/recipes/search?q=cake").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "Looking for \"cake\"");
    assert_eq!(json["search_term"], "cake");
}

#[tokio::test]
async fn test_read_unknown_recipe() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<entity::recipe::Model>::new()])
        .into_connection();

    // Act
    let (status, _) = get(create_test_router(db), "/api/recipes/42").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<entity::category::Model>::new()])
        .into_connection();

    let (status, _) = get(create_test_router(db), "/api/recipes/category/7").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_category_is_not_found() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![entity::category::Model {
            id: 2,
            name: "Cakes".to_string(),
        }]])
        .append_query_results([[count_row(0)]])
        .into_connection();

    // Act
    let (status, _) = get(create_test_router(db), "/api/recipes/category/2").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tag_without_recipes_is_not_found() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![entity::tag::Model {
            id: 3,
            name: "dessert".to_string(),
            slug: "dessert".to_string(),
        }]])
        .append_query_results([Vec::<entity::recipe_tag::Model>::new()])
        .into_connection();

    // Act
    let (status, _) = get(create_test_router(db), "/api/recipes/tag/dessert").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_categories() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            entity::category::Model {
                id: 2,
                name: "Cakes".to_string(),
            },
            entity::category::Model {
                id: 1,
                name: "Soups".to_string(),
            },
        ]])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/categories").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"items": [{"id": 2, "name": "Cakes"}, {"id": 1, "name": "Soups"}]})
    );
}

#[tokio::test]
async fn test_author_with_invalid_uuid() {
    let (status, _) = get(create_test_router(empty_db()), "/api/authors/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_recipes_with_tag() {
    // Arrange
    let dessert = entity::tag::Model {
        id: 3,
        name: "dessert".to_string(),
        slug: "dessert".to_string(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![dessert.clone()]])
        .append_query_results([vec![entity::recipe_tag::Model {
            recipe_id: 11,
            tag_id: 3,
        }]])
        .append_query_results([[count_row(1)]])
        .append_query_results([vec![recipe_row(11)]])
        .append_query_results([vec![entity::category::Model {
            id: 2,
            name: "Cakes".to_string(),
        }]])
        .append_query_results([vec![entity::recipe_tag::Model {
            recipe_id: 11,
            tag_id: 3,
        }]])
        .append_query_results([vec![dessert]])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/recipes/tag/dessert").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["title"], "Tag \"dessert\"");
    assert_eq!(json["recipes"][0]["id"], 11);
    assert_eq!(json["recipes"][0]["tags"][0]["name"], "dessert");
    assert_eq!(json["recipes"][0]["tags"][0]["slug"], "dessert");
}

#[tokio::test]
async fn test_read_recipe() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![recipe_row(11)]])
        .append_query_results([vec![entity::category::Model {
            id: 2,
            name: "Cakes".to_string(),
        }]])
        .append_query_results([Vec::<entity::recipe_tag::Model>::new()])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/recipes/11").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["id"], 11);
    assert_eq!(json["slug"], "carrot-cake-11");
    assert_eq!(json["category_name"], "Cakes");
    assert_eq!(json["author_name"], "");
    assert_eq!(json["tags"], serde_json::json!([]));
}

#[tokio::test]
async fn test_read_tag() {
    // Arrange
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![entity::tag::Model {
            id: 3,
            name: "Bolo de Cenoura".to_string(),
            slug: "bolo-de-cenoura".to_string(),
        }]])
        .into_connection();

    // Act
    let (status, body) = get(create_test_router(db), "/api/tags/3").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let json: Json = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 3, "name": "Bolo de Cenoura", "slug": "bolo-de-cenoura" })
    );
}
