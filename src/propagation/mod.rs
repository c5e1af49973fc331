mod error;
mod frames;
mod propagator;

pub use error::PropagationError;
pub use frames::{FrameConverter, GeodeticLocation, SiderealFrame};
pub use propagator::{Propagator, Sgp4Propagator, StateVector};

/// Cartesian vector in kilometres (positions) or kilometres per second (velocities).
pub type Vector3 = nalgebra::Vector3<f64>;

/// WGS-72 equatorial radius, the reference the SGP4 model works against.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.135;
