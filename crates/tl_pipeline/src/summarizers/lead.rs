use async_trait::async_trait;
use tl_core::{Article, Result, Summarizer};

const DEFAULT_MAX_WORDS: usize = 50;

/// Extractive summary: the leading words of the event's titles and snippets.
#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    max_words: usize,
}

impl LeadSummarizer {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

#[async_trait]
impl Summarizer for LeadSummarizer {
    fn name(&self) -> &str {
        "lead"
    }

    async fn summarize(&self, articles: &[Article]) -> Result<String> {
        let combined = articles
            .iter()
            .map(|a| format!("{}. {}", a.title.trim_end_matches('.'), a.snippet))
            .collect::<Vec<_>>()
            .join(" ");
        let words: Vec<&str> = combined.split_whitespace().take(self.max_words).collect();
        Ok(words.join(" "))
    }
}
