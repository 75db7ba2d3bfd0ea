use chrono::{Days, NaiveDate};
use tl_core::{EmbeddedArticle, Error, Result};

/// Articles published within `[center - delta, center + delta]`.
///
/// A window only holds indices into the article slice it was cut from, so
/// the same article can sit in several overlapping windows without copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub center: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub members: Vec<usize>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn articles<'a>(
        &'a self,
        articles: &'a [EmbeddedArticle],
    ) -> impl Iterator<Item = &'a EmbeddedArticle> + 'a {
        self.members.iter().map(move |&i| &articles[i])
    }
}

/// Splits `articles` into overlapping windows.
///
/// Centers run from `min_date + window_delta` to `max_date - window_delta`
/// inclusive, advancing by `step` days:
///
/// ```text
/// window_delta=0, step=1 --> [4-4, 5-5, 6-6, ...]
/// window_delta=1, step=1 --> [3-5, 4-6, 5-7, ...]
/// window_delta=0, step=2 --> [4-4, 6-6, 8-8, ...]
/// ```
///
/// Centers whose window covers no article are skipped, so with
/// `window_delta=0, step=1` there is one window per publication day.
pub fn partition_into_windows(
    articles: &[EmbeddedArticle],
    window_delta: u32,
    step: u32,
) -> Result<Vec<Window>> {
    if step == 0 {
        return Err(Error::InvalidConfig("step must be at least 1 day".to_string()));
    }

    let dates: Vec<NaiveDate> = articles.iter().map(|a| a.date()).collect();
    let (Some(&min_date), Some(&max_date)) = (dates.iter().min(), dates.iter().max()) else {
        return Ok(Vec::new());
    };

    let delta = Days::new(u64::from(window_delta));
    let (Some(first), Some(last)) = (
        min_date.checked_add_days(delta),
        max_date.checked_sub_days(delta),
    ) else {
        return Ok(Vec::new());
    };

    let mut windows = Vec::new();
    let mut center = first;
    while center <= last {
        let (Some(start), Some(end)) =
            (center.checked_sub_days(delta), center.checked_add_days(delta))
        else {
            break;
        };
        let members = dates
            .iter()
            .enumerate()
            .filter(|(_, date)| start <= **date && **date <= end)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if !members.is_empty() {
            windows.push(Window { center, start, end, members });
        }

        match center.checked_add_days(Days::new(u64::from(step))) {
            Some(next) => center = next,
            None => break,
        }
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article_on;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_windows() {
        assert!(partition_into_windows(&[], 1, 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let articles = vec![article_on("a", "2024-01-01", vec![0.0])];
        assert!(partition_into_windows(&articles, 0, 0).is_err());
    }

    #[test]
    fn test_span_shorter_than_window_yields_nothing() {
        let articles = vec![
            article_on("a", "2024-01-01", vec![0.0]),
            article_on("b", "2024-01-02", vec![0.0]),
        ];
        assert!(partition_into_windows(&articles, 1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_span_equal_to_window_yields_one_window() {
        let articles = vec![
            article_on("a", "2024-01-01", vec![0.0]),
            article_on("b", "2024-01-03", vec![0.0]),
        ];
        let windows = partition_into_windows(&articles, 1, 1).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].center, day(2));
        assert_eq!(windows[0].members, vec![0, 1]);
    }

    #[test]
    fn test_overlapping_windows_share_articles() {
        let articles: Vec<_> = (1..=4)
            .map(|d| article_on(&format!("a{d}"), &format!("2024-01-0{d}"), vec![0.0]))
            .collect();
        let windows = partition_into_windows(&articles, 1, 1).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].members, vec![0, 1, 2]);
        assert_eq!(windows[1].members, vec![1, 2, 3]);
    }

    #[test]
    fn test_gap_days_are_skipped() {
        let articles = vec![
            article_on("a", "2024-01-01", vec![0.0]),
            article_on("b", "2024-01-03", vec![0.0]),
        ];
        let windows = partition_into_windows(&articles, 0, 1).unwrap();
        let centers: Vec<_> = windows.iter().map(|w| w.center).collect();
        assert_eq!(centers, vec![day(1), day(3)]);
        assert!(windows.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn test_members_keep_input_order_and_time_of_day_is_ignored() {
        let articles = vec![
            article_on("late", "2024-01-02T23:59:00Z", vec![0.0]),
            article_on("early", "2024-01-02T00:01:00Z", vec![0.0]),
        ];
        let windows = partition_into_windows(&articles, 0, 1).unwrap();
        assert_eq!(windows.len(), 1);
        let titles: Vec<_> = windows[0].articles(&articles).map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["late", "early"]);
    }
}
