mod filter;
mod handle;
mod merger;
mod status;
mod types;

pub use filter::ObjectFilter;
pub use handle::CatalogHandle;
pub use merger::{merge, CategoryBatch};
pub use status::{transition, ObjectStatus, Outcome};
pub use types::{Catalog, DerivedState, TrackedObject};
