use utoipa::OpenApi;

use super::api::{catalog, categories, error::ErrorResponse, view};

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::list_objects,
        catalog::get_object,
        catalog::get_orbit,
        categories::list_categories,
        categories::set_categories,
        view::select,
        view::satellite_view,
        view::frame,
    ),
    components(
        schemas(
            catalog::ObjectDetail,
            catalog::CatalogResponse,
            catalog::OrbitResponse,
            categories::CategoryInfo,
            categories::CategoriesResponse,
            categories::SetCategoriesRequest,
            view::SelectRequest,
            view::SatelliteViewRequest,
            view::CameraStatus,
            crate::scene::ViewState,
            crate::scene::CameraMode,
            crate::catalog::ObjectStatus,
            crate::propagation::GeodeticLocation,
            ErrorResponse,
        )
    ),
    info(
        title = "Orbit Watch API",
        description = "Live catalog of propagated orbital objects and camera targeting",
        version = "0.1.0"
    ),
    tags(
        (name = "catalog", description = "Published catalog and orbit paths"),
        (name = "categories", description = "Active category selection"),
        (name = "view", description = "Camera selection and targeting")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/catalog",
            "/api/catalog/{id}",
            "/api/catalog/{id}/orbit",
            "/api/categories",
            "/api/view/select",
            "/api/view/satellite_view",
            "/api/view/frame",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
