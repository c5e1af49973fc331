use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::{ObjectFilter, ObjectStatus, TrackedObject};
use crate::propagation::GeodeticLocation;
use crate::scene::SceneScale;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// One tracked object with its derived metrics.
#[derive(Debug, Serialize, ToSchema)]
pub struct ObjectDetail {
    pub id: String,
    pub name: String,
    pub category: String,
    pub status: ObjectStatus,
    pub epoch: DateTime<Utc>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub inertial_position: Option<[f64; 3]>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub inertial_velocity: Option<[f64; 3]>,
    pub geodetic_location: Option<GeodeticLocation>,
    /// Scene-space marker position derived from the geodetic location.
    #[schema(value_type = Option<Vec<f64>>)]
    pub scene_position: Option<[f64; 3]>,
    pub speed_km_s: Option<f64>,
    pub altitude_km: Option<f64>,
    pub period_minutes: Option<f64>,
    pub inclination_deg: f64,
    pub right_ascension_deg: f64,
}

impl ObjectDetail {
    pub fn new(object: &TrackedObject, scale: &SceneScale) -> Self {
        ObjectDetail {
            id: object.id.clone(),
            name: object.name.clone(),
            category: object.category.clone(),
            status: object.status,
            epoch: object.elements.epoch,
            inertial_position: object.inertial_position.map(|v| [v.x, v.y, v.z]),
            inertial_velocity: object.inertial_velocity.map(|v| [v.x, v.y, v.z]),
            geodetic_location: object.geodetic_location,
            scene_position: object.geodetic_location.map(|location| {
                let p = scale.geodetic_position(&location);
                [p.x, p.y, p.z]
            }),
            speed_km_s: object.speed_km_s(),
            altitude_km: object.altitude_km(),
            period_minutes: object.elements.period_minutes(),
            inclination_deg: object.elements.inclination_deg,
            right_ascension_deg: object.elements.right_ascension_deg,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub generation: u64,
    pub version: u64,
    pub computed_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub objects: Vec<ObjectDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrbitResponse {
    pub id: String,
    /// Instant the first point was sampled at.
    pub start: DateTime<Utc>,
    /// Scene-space points of one revolution.
    #[schema(value_type = Vec<Vec<f64>>)]
    pub points: Vec<[f64; 3]>,
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    params(ObjectFilter),
    responses(
        (status = 200, description = "Published catalog, filtered", body = CatalogResponse)
    ),
    tag = "catalog"
)]
pub async fn list_objects(
    State(state): State<AppState>,
    Query(filter): Query<ObjectFilter>,
) -> Json<CatalogResponse> {
    let snapshot = state.catalog.snapshot();
    let objects = filter
        .apply(&snapshot)
        .into_iter()
        .map(|object| ObjectDetail::new(object, &state.scale))
        .collect();

    Json(CatalogResponse {
        generation: snapshot.generation,
        version: snapshot.version,
        computed_at: snapshot.computed_at,
        total: snapshot.objects.len(),
        objects,
    })
}

#[utoipa::path(
    get,
    path = "/api/catalog/{id}",
    params(
        ("id" = String, Path, description = "Catalog number")
    ),
    responses(
        (status = 200, description = "Tracked object", body = ObjectDetail),
        (status = 404, description = "Object not in the catalog", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ObjectDetail>> {
    let snapshot = state.catalog.snapshot();
    let object = snapshot
        .objects
        .get(&id)
        .ok_or(ApiError::NotFound("object_not_found"))?;
    Ok(Json(ObjectDetail::new(object, &state.scale)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/{id}/orbit",
    params(
        ("id" = String, Path, description = "Catalog number")
    ),
    responses(
        (status = 200, description = "Sampled orbit path", body = OrbitResponse),
        (status = 404, description = "Object not in the catalog", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_orbit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrbitResponse>> {
    let snapshot = state.catalog.snapshot();
    let object = snapshot
        .objects
        .get(&id)
        .ok_or(ApiError::NotFound("object_not_found"))?;

    let now = Utc::now();
    let path = state.orbit_cache.get_or_sample(
        &object.elements,
        now,
        state.propagator.as_ref(),
        &state.scale,
    );

    Ok(Json(OrbitResponse {
        id,
        start: state.orbit_cache.bucket_start(state.orbit_cache.bucket_of(now)),
        points: path.iter().map(|p| [p.x, p.y, p.z]).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::state::testing::loaded_state;

    #[tokio::test]
    async fn lists_published_objects() {
        let state = loaded_state().await;
        let Json(response) = list_objects(State(state), Query(ObjectFilter::default())).await;
        assert_eq!(response.total, 1);
        assert_eq!(response.objects.len(), 1);
        assert_eq!(response.objects[0].id, "25544");
        assert!(response.objects[0].speed_km_s.is_some());

        // stub frame: equator, prime meridian, 7000 km from the centre
        let [x, y, z] = response.objects[0].scene_position.unwrap();
        assert!((x - 7000.0 / 6371.0 * 2.5).abs() < 1e-9);
        assert!(y.abs() < 1e-9 && z.abs() < 1e-9);
    }

    #[tokio::test]
    async fn search_filters_the_list() {
        let state = loaded_state().await;
        let filter = ObjectFilter {
            search: Some("hubble".into()),
            ..Default::default()
        };
        let Json(response) = list_objects(State(state), Query(filter)).await;
        assert_eq!(response.total, 1);
        assert!(response.objects.is_empty());
    }

    #[tokio::test]
    async fn unknown_object_is_not_found() {
        let state = loaded_state().await;
        let result = get_object(State(state), Path("99999".into())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn orbit_has_a_full_loop() {
        let state = loaded_state().await;
        let Json(orbit) = get_orbit(State(state.clone()), Path("25544".into()))
            .await
            .unwrap();
        assert_eq!(orbit.points.len(), state.config.scene.orbit_segments + 1);
        assert_eq!(state.orbit_cache.len(), 1);
    }
}
