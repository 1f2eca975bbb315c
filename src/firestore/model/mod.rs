mod resource_path;

pub use resource_path::{collection_from_path, document_from_path, split_path, ResourcePath};
