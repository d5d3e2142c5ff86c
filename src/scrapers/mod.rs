pub mod morpho_api; // GraphQL vault listing (single request per refresh)

pub use morpho_api::{load_snapshot_file, MorphoClient};
