mod cache;
mod camera;
mod transform;

pub use cache::OrbitPathCache;
pub use camera::{Camera, CameraMode, ViewState};
pub use transform::{
    geodetic_to_scene, inertial_to_scene, sample_orbit, SceneScale, ORBIT_SEGMENTS,
};
