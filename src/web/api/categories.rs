use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::ObjectStatus;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryInfo {
    pub key: String,
    pub pinned_status: Option<ObjectStatus>,
    pub active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub generation: u64,
    /// Active keys in request order; later keys win duplicate identifiers.
    pub active: Vec<String>,
    /// Whether the periodic re-propagation is currently running.
    pub ticking: bool,
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCategoriesRequest {
    pub active: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Configured and active categories", body = CategoriesResponse)
    ),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let pipeline = state.pipeline.lock().await;
    let ticking = pipeline.is_ticking().await;
    Json(describe(pipeline.active(), ticking, &state))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = SetCategoriesRequest,
    responses(
        (status = 200, description = "Rebuild started for the new set", body = CategoriesResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn set_categories(
    State(state): State<AppState>,
    Json(request): Json<SetCategoriesRequest>,
) -> ApiResult<Json<CategoriesResponse>> {
    let mut pipeline = state.pipeline.lock().await;
    pipeline.set_active_categories(request.active).await?;
    let ticking = pipeline.is_ticking().await;
    Ok(Json(describe(pipeline.active(), ticking, &state)))
}

fn describe(active: &[String], ticking: bool, state: &AppState) -> CategoriesResponse {
    CategoriesResponse {
        generation: state.catalog.generation(),
        active: active.to_vec(),
        ticking,
        categories: state
            .config
            .categories
            .iter()
            .map(|(key, category)| CategoryInfo {
                key: key.clone(),
                pinned_status: category.pinned_status,
                active: active.contains(key),
            })
            .collect(),
    }
}
