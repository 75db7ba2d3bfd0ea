pub mod models;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{ClusteringError, Error, Result};
pub use models::Summarizer;
pub use storage::{ArticleSource, TimelineCache};
pub use types::{Article, EmbeddedArticle, Event, Timeline};
