mod common;

use std::collections::BTreeSet;
use common::{article, day};
use proptest::prelude::*;
use tl_pipeline::windows::partition_into_windows;

proptest! {
    #[test]
    fn window_spans_at_most_two_deltas(
        offsets in prop::collection::vec(0u64..40, 1..60),
        window_delta in 0u32..4,
        step in 1u32..5,
    ) {
        let start = day(2024, 1, 1);
        let articles: Vec<_> = offsets
            .iter()
            .enumerate()
            .map(|(i, &o)| article(&format!("a{i}"), start + chrono::Days::new(o), 12, vec![0.0]))
            .collect();

        for window in partition_into_windows(&articles, window_delta, step).unwrap() {
            let dates: Vec<_> = window.articles(&articles).map(|a| a.date()).collect();
            let min = *dates.iter().min().unwrap();
            let max = *dates.iter().max().unwrap();
            prop_assert!((max - min).num_days() <= 2 * i64::from(window_delta));
            prop_assert!(window.start <= min && max <= window.end);
        }
    }

    #[test]
    fn daily_windows_match_distinct_days(offsets in prop::collection::vec(0u64..30, 1..50)) {
        let start = day(2024, 1, 1);
        let articles: Vec<_> = offsets
            .iter()
            .enumerate()
            .map(|(i, &o)| article(&format!("a{i}"), start + chrono::Days::new(o), 6, vec![0.0]))
            .collect();
        let distinct: BTreeSet<_> = articles.iter().map(|a| a.date()).collect();

        let windows = partition_into_windows(&articles, 0, 1).unwrap();
        prop_assert_eq!(windows.len(), distinct.len());
        for window in &windows {
            prop_assert!(window.articles(&articles).all(|a| a.date() == window.center));
        }
    }
}
