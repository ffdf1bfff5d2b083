mod auth;
mod authors;
mod categories;
mod dashboard;
pub(crate) mod db;
pub mod dto;
mod get_recipe;
mod list_recipes;
mod profile_form;
pub mod recipe_form;
mod tags;
pub(crate) mod types;

use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::Arc,
};

use anyhow::Context;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use jwt_authorizer::{authorizer::IntoLayer, Authorizer, JwtAuthorizer, Validation};
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use thiserror::Error;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};
use utoipa::OpenApi;

use crate::{
    config::AppConfig,
    monitoring::{health_routes, HealthMonitor},
    pagination::PaginationConfig,
};

use self::{
    auth::User,
    authors::api_read_author,
    categories::api_list_categories,
    dashboard::{
        api_create_draft, api_delete_draft, api_list_drafts, api_publish_draft, api_read_draft,
        api_update_draft, api_update_profile,
    },
    get_recipe::api_read_recipe,
    list_recipes::{
        api_list_category_recipes, api_list_recipes, api_list_tag_recipes, api_search_recipes,
    },
    tags::api_read_tag,
};

pub(crate) const TAG_RECIPES: &str = "recipes";
pub(crate) const TAG_DASHBOARD: &str = "dashboard";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_recipes::api_list_recipes,
        list_recipes::api_search_recipes,
        list_recipes::api_list_category_recipes,
        list_recipes::api_list_tag_recipes,
        get_recipe::api_read_recipe,
        tags::api_read_tag,
        categories::api_list_categories,
        authors::api_read_author,
        dashboard::api_list_drafts,
        dashboard::api_create_draft,
        dashboard::api_read_draft,
        dashboard::api_update_draft,
        dashboard::api_delete_draft,
        dashboard::api_publish_draft,
        dashboard::api_update_profile,
    ),
    components(schemas(recipe_form::RecipeForm, profile_form::ProfileForm)),
    tags(
        (name = TAG_RECIPES, description = "Published recipes"),
        (name = TAG_DASHBOARD, description = "Authoring of the caller's own recipes"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct ApiContext {
    db: Arc<DatabaseConnection>,
    pagination: PaginationConfig,
    media_url: Arc<str>,
}

impl ApiContext {
    pub fn new(
        db: impl Into<Arc<DatabaseConnection>>,
        pagination: PaginationConfig,
        media_url: &str,
    ) -> Self {
        Self {
            db: db.into(),
            pagination,
            media_url: Arc::from(media_url),
        }
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) fn media_url(&self) -> &str {
        &self.media_url
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ApiErrors {
    #[error("Internal server error")]
    InternalServerError,
    #[error("Bad request: {0}")]
    BadRequestJson(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    PermissionDenied,
}

impl IntoResponse for ApiErrors {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiErrors::PermissionDenied => (
                StatusCode::UNAUTHORIZED,
                ApiErrors::PermissionDenied.to_string(),
            )
                .into_response(),
            ApiErrors::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            )
                .into_response(),
            ApiErrors::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiErrors::BadRequestJson(jsonstring) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                jsonstring,
            )
                .into_response(),
            ApiErrors::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
        }
    }
}

/// Postgres error code `23505`: value violates a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => {
            e.code().unwrap_or_default() == "23505"
        }
        _ => false,
    }
}

impl From<DbErr> for ApiErrors {
    fn from(value: DbErr) -> Self {
        if is_unique_violation(&value) {
            return ApiErrors::BadRequest("Duplicate recipe".to_string());
        }
        match value {
            DbErr::RecordNotFound(t) => ApiErrors::NotFound(t),
            _ => {
                error!("Database error: {:?}", value);
                ApiErrors::InternalServerError
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiErrors {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiErrors::BadRequestJson(
            serde_json::to_string(&recipe_form::field_messages(&err))
                .unwrap_or("Validation error".to_owned()),
        )
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

pub async fn serve(db: DatabaseConnection, config: AppConfig) -> anyhow::Result<()> {
    let db = Arc::new(db);
    let ctx = ApiContext::new(db.clone(), config.pagination, &config.media_url);
    let monitor = Arc::new(HealthMonitor::new(db));
    // build our application with a route
    let app = api_routes(ctx, &config.jwt_issuer)
        .await?
        .nest("/app", health_routes(monitor))
        .layer(TraceLayer::new_for_http());

    tracing::debug!("Initializing service...");
    let addr = SocketAddr::new(IpAddr::from_str("::")?, config.port);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Cannot start server")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running server")?;

    debug!("Shutdown complete");
    Ok(())
}

/// Routes readable without authentication.
pub fn public_routes() -> Router<ApiContext> {
    Router::new()
        .route("/recipes", get(api_list_recipes))
        .route("/recipes/search", get(api_search_recipes))
        .route(
            "/recipes/category/:category_id",
            get(api_list_category_recipes),
        )
        .route("/recipes/tag/:tag_name", get(api_list_tag_recipes))
        .route("/recipes/:recipe_id", get(api_read_recipe))
        .route("/tags/:tag_id", get(api_read_tag))
        .route("/categories", get(api_list_categories))
        .route("/authors/:author_id", get(api_read_author))
}

/// Routes of the author dashboard. Handlers expect the JWT layer in front.
pub(crate) fn dashboard_routes() -> Router<ApiContext> {
    Router::new()
        .route(
            "/dashboard/recipes",
            get(api_list_drafts).post(api_create_draft),
        )
        .route(
            "/dashboard/recipes/:recipe_id",
            get(api_read_draft)
                .put(api_update_draft)
                .delete(api_delete_draft),
        )
        .route(
            "/dashboard/recipes/:recipe_id/publish",
            post(api_publish_draft),
        )
        .route("/dashboard/profile", put(api_update_profile))
}

async fn api_routes(ctx: ApiContext, issuer: &str) -> anyhow::Result<Router> {
    let validation = Validation::new().iss(&[issuer]).leeway(5);
    let jwt_auth: Authorizer<User> = JwtAuthorizer::from_oidc(issuer)
        .validation(validation)
        .build()
        .await
        .context("Cannot set up token validation")?;

    Ok(Router::new().nest(
        "/api",
        public_routes()
            .merge(dashboard_routes().layer(jwt_auth.into_layer()))
            .with_state(ctx),
    ))
}
