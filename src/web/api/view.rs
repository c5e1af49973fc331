use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scene::{CameraMode, ViewState};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    /// Catalog number to select; `null` clears the selection.
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SatelliteViewRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CameraStatus {
    pub mode: CameraMode,
    pub selected: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/view/select",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Selection changed, camera is free", body = CameraStatus),
        (status = 404, description = "Object not in the catalog", body = ErrorResponse)
    ),
    tag = "view"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Json<CameraStatus>> {
    if let Some(id) = &request.id {
        if state.catalog.snapshot().objects.get(id).is_none() {
            return Err(ApiError::NotFound("object_not_found"));
        }
    }

    let mut camera = state.camera.lock().await;
    camera.select(request.id);
    Ok(Json(CameraStatus {
        mode: camera.mode(),
        selected: camera.selected().map(str::to_string),
    }))
}

#[utoipa::path(
    post,
    path = "/api/view/satellite_view",
    request_body = SatelliteViewRequest,
    responses(
        (status = 200, description = "Resulting camera mode", body = CameraStatus)
    ),
    tag = "view"
)]
pub async fn satellite_view(
    State(state): State<AppState>,
    Json(request): Json<SatelliteViewRequest>,
) -> Json<CameraStatus> {
    let snapshot = state.catalog.snapshot();
    let mut camera = state.camera.lock().await;
    let mode = camera.set_satellite_view(request.enabled, &snapshot.objects);
    Json(CameraStatus {
        mode,
        selected: camera.selected().map(str::to_string),
    })
}

#[utoipa::path(
    get,
    path = "/api/view/frame",
    responses(
        (status = 200, description = "Camera state after one frame", body = ViewState)
    ),
    tag = "view"
)]
pub async fn frame(State(state): State<AppState>) -> Json<ViewState> {
    let snapshot = state.catalog.snapshot();
    let mut camera = state.camera.lock().await;
    Json(camera.frame(&snapshot.objects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::state::testing::loaded_state;

    #[tokio::test]
    async fn locks_onto_selected_object() {
        let state = loaded_state().await;

        let Json(status) = satellite_view(
            State(state.clone()),
            Json(SatelliteViewRequest { enabled: true }),
        )
        .await;
        assert_eq!(status.mode, CameraMode::Free);

        select(
            State(state.clone()),
            Json(SelectRequest {
                id: Some("25544".into()),
            }),
        )
        .await
        .unwrap();
        let Json(status) = satellite_view(
            State(state.clone()),
            Json(SatelliteViewRequest { enabled: true }),
        )
        .await;
        assert_eq!(status.mode, CameraMode::Locked);
        assert_eq!(status.selected.as_deref(), Some("25544"));

        let Json(view) = frame(State(state)).await;
        assert_eq!(view.mode, CameraMode::Locked);
        assert!(!view.zoom_enabled);
        assert!(view.target.norm() > 0.0);
    }

    #[tokio::test]
    async fn selecting_unknown_object_fails() {
        let state = loaded_state().await;
        let result = select(
            State(state),
            Json(SelectRequest {
                id: Some("20580".into()),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
