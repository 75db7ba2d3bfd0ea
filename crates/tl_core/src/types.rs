use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: Url,
    pub thumbnail_url: Url,
    pub date_published: DateTime<Utc>,
    pub snippet: String,
}

impl Article {
    /// Publication day, ignoring the time of day.
    pub fn date(&self) -> NaiveDate {
        self.date_published.date_naive()
    }
}

/// An article as handed over by the ingestion side, with its semantic embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(alias = "embeddings")]
    pub embedding: Vec<f32>,
}

impl EmbeddedArticle {
    pub fn new(article: Article, embedding: Vec<f32>) -> Self {
        Self { article, embedding }
    }

    /// Copy of the article without its embedding.
    pub fn to_article(&self) -> Article {
        self.article.clone()
    }
}

impl Deref for EmbeddedArticle {
    type Target = Article;

    fn deref(&self) -> &Self::Target {
        &self.article
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub events: Vec<Event>,
}

impl Timeline {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
