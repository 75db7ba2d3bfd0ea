pub mod json_file;
pub mod memory;

pub use json_file::{JsonFileSource, DEFAULT_THUMBNAIL_URL};
pub use memory::InMemoryCache;
