use std::collections::BTreeMap;
use chrono::NaiveDate;
use tl_core::{EmbeddedArticle, Event};
use crate::clustering::Cluster;

/// Builds the event backed by `cluster`.
///
/// Articles keep the cluster's order and lose their embeddings. The summary
/// is left empty; it is attached later, outside the pipeline.
pub fn synthesize_event(articles: &[EmbeddedArticle], cluster: &Cluster) -> Event {
    Event {
        name: event_title(articles, cluster).to_string(),
        date: modal_date(articles, cluster),
        articles: cluster.articles(articles).map(EmbeddedArticle::to_article).collect(),
        summary: None,
    }
}

/// Title of the article closest to the cluster's mean embedding. The first
/// article wins when several are equally close.
pub fn event_title<'a>(articles: &'a [EmbeddedArticle], cluster: &Cluster) -> &'a str {
    let members = cluster.members();
    let centroid = centroid(members.iter().map(|&i| articles[i].embedding.as_slice()));

    let mut best = members[0];
    let mut best_distance = f64::INFINITY;
    for &i in members {
        let distance = euclidean_to(&centroid, &articles[i].embedding);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    &articles[best].title
}

/// Most common publication day. Ties go to the earliest day.
pub fn modal_date(articles: &[EmbeddedArticle], cluster: &Cluster) -> NaiveDate {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for article in cluster.articles(articles) {
        *counts.entry(article.date()).or_insert(0) += 1;
    }

    let mut mode = articles[cluster.members()[0]].date();
    let mut mode_count = 0;
    for (date, count) in counts {
        if count > mode_count {
            mode = date;
            mode_count = count;
        }
    }
    mode
}

fn centroid<'a>(rows: impl Iterator<Item = &'a [f32]>) -> Vec<f64> {
    let mut sum: Vec<f64> = Vec::new();
    let mut count = 0usize;
    for row in rows {
        if sum.len() < row.len() {
            sum.resize(row.len(), 0.0);
        }
        for (acc, &x) in sum.iter_mut().zip(row) {
            *acc += f64::from(x);
        }
        count += 1;
    }
    if count > 0 {
        let n = count as f64;
        sum.iter_mut().for_each(|x| *x /= n);
    }
    sum
}

fn euclidean_to(point: &[f64], row: &[f32]) -> f64 {
    point
        .iter()
        .zip(row)
        .map(|(&p, &x)| {
            let d = p - f64::from(x);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article_on;

    #[test]
    fn test_title_is_nearest_to_centroid() {
        let articles = vec![
            article_on("left", "2024-01-01", vec![0.0, 0.0]),
            article_on("middle", "2024-01-01", vec![1.0, 0.0]),
            article_on("right", "2024-01-01", vec![2.0, 0.0]),
        ];
        let cluster = Cluster::new(0, vec![0, 1, 2]);
        assert_eq!(event_title(&articles, &cluster), "middle");
    }

    #[test]
    fn test_title_ties_go_to_first_article() {
        let articles = vec![
            article_on("first", "2024-01-01", vec![0.0]),
            article_on("second", "2024-01-01", vec![2.0]),
        ];
        let cluster = Cluster::new(0, vec![0, 1]);
        assert_eq!(event_title(&articles, &cluster), "first");
    }

    #[test]
    fn test_modal_date_prefers_most_frequent_then_earliest() {
        let articles = vec![
            article_on("a", "2024-01-03", vec![0.0]),
            article_on("b", "2024-01-02", vec![0.0]),
            article_on("c", "2024-01-03", vec![0.0]),
            article_on("d", "2024-01-02", vec![0.0]),
            article_on("e", "2024-01-04", vec![0.0]),
        ];
        let cluster = Cluster::new(0, vec![0, 1, 2, 3, 4]);
        assert_eq!(modal_date(&articles, &cluster), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let cluster = Cluster::new(0, vec![0, 2, 4]);
        assert_eq!(modal_date(&articles, &cluster), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_singleton_cluster() {
        let articles = vec![
            article_on("skipped", "2024-02-01", vec![5.0]),
            article_on("only", "2024-02-02T10:00:00Z", vec![1.0]),
        ];
        let event = synthesize_event(&articles, &Cluster::new(3, vec![1]));
        assert_eq!(event.name, "only");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
        assert_eq!(event.articles, vec![articles[1].to_article()]);
        assert_eq!(event.summary, None);
    }

    #[test]
    fn test_articles_keep_cluster_order() {
        let articles = vec![
            article_on("newer", "2024-01-05", vec![0.0]),
            article_on("older", "2024-01-01", vec![0.1]),
        ];
        let event = synthesize_event(&articles, &Cluster::new(0, vec![0, 1]));
        let titles: Vec<_> = event.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }
}
