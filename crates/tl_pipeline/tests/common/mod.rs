use chrono::{NaiveDate, TimeZone, Utc};
use tl_core::{Article, EmbeddedArticle};
use url::Url;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn article(title: &str, date: NaiveDate, hour: u32, embedding: Vec<f32>) -> EmbeddedArticle {
    let slug = title.to_lowercase().replace(' ', "-");
    EmbeddedArticle::new(
        Article {
            title: title.to_string(),
            url: Url::parse(&format!("https://news.example.com/{slug}")).unwrap(),
            thumbnail_url: Url::parse(&format!("https://img.example.com/{slug}.jpg")).unwrap(),
            date_published: Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap()),
            snippet: format!("{title} snippet"),
        },
        embedding,
    )
}
