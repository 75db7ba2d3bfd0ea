pub mod clustering;
pub mod config;
pub mod events;
pub mod filter;
pub mod pipeline;
pub mod service;
pub mod summarizers;
pub mod windows;

pub use clustering::{ClusteringBackend, Optics};
pub use config::{MinSamples, PipelineConfig};
pub use filter::JunkPolicy;
pub use pipeline::Pipeline;
pub use service::{ServiceConfig, TimelineService};
pub use summarizers::create_summarizer;

pub mod prelude {
    pub use super::{JunkPolicy, MinSamples, Pipeline, PipelineConfig, TimelineService};
    pub use tl_core::{Article, EmbeddedArticle, Error, Event, Result, Timeline};
}
