use std::sync::Arc;
use tl_core::{Error, Result, Summarizer};

pub mod lead;

pub use lead::LeadSummarizer;

pub fn create_summarizer(name: &str, max_words: Option<usize>) -> Result<Arc<dyn Summarizer>> {
    match name.to_lowercase().as_str() {
        "lead" => Ok(Arc::new(
            max_words.map(LeadSummarizer::new).unwrap_or_default(),
        )),
        other => Err(Error::InvalidConfig(format!(
            "Unknown summarizer: {}. Available summarizers: lead",
            other
        ))),
    }
}
