pub mod loader;
pub mod policy;
pub mod seed;

pub use loader::{ClassificationLoad, ClassificationLoader, ClassificationLoaderError, load_or_empty};
pub use policy::{PolicyLoader, PolicyLoaderError};
pub use seed::sample_classifications;
