use axum::{routing::get, routing::post, Router};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, ConfigError};
use crate::pipeline::{Pipeline, PipelineError};

use super::api::catalog as catalog_handlers;
use super::api::categories as category_handlers;
use super::api::view as view_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Catalog
        .route("/api/catalog", get(catalog_handlers::list_objects))
        .route("/api/catalog/{id}", get(catalog_handlers::get_object))
        .route("/api/catalog/{id}/orbit", get(catalog_handlers::get_orbit))
        // Categories
        .route("/api/categories", get(category_handlers::list_categories))
        .route("/api/categories", post(category_handlers::set_categories))
        // Camera
        .route("/api/view/select", post(view_handlers::select))
        .route(
            "/api/view/satellite_view",
            post(view_handlers::satellite_view),
        )
        .route("/api/view/frame", get(view_handlers::frame))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();

    let mut pipeline = Pipeline::from_config(&config)?;
    pipeline.set_active_categories(config.active.clone()).await?;
    let state = AppState::new(config, pipeline)?;

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
