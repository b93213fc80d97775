use proptest::prelude::*;
use search_service::{rank_results, SearchManga, SourceResults};
use std::collections::HashSet;

const SOURCES: [&str; 4] = ["mangadex", "mangakakalot", "manganato", "comick"];

fn source_pages() -> impl Strategy<Value = Vec<SourceResults>> {
    prop::collection::vec(
        (
            prop::sample::select(SOURCES.to_vec()),
            prop::collection::vec(("/[a-f]{1,2}", "[a-z ]{0,12}"), 0..8),
        ),
        0..4,
    )
    .prop_map(|pages| {
        pages
            .into_iter()
            .map(|(source, items)| {
                SourceResults::new(
                    source,
                    items
                        .into_iter()
                        .map(|(url, title)| SearchManga::new(url, title))
                        .collect(),
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_scores_stay_in_range(pages in source_pages(), query in "[a-z ]{0,8}") {
        let ranked = rank_results(&pages, &[], &query);
        for result in &ranked.results {
            prop_assert!((0.0..=100.0).contains(&result.score));
        }
    }

    /// One entry per distinct URL, whatever the number of sources returning it.
    #[test]
    fn prop_deduplicates_by_url(pages in source_pages(), query in "[a-z]{0,6}") {
        let ranked = rank_results(&pages, &[], &query);

        let distinct: HashSet<&str> = pages
            .iter()
            .flat_map(|page| page.items.iter().map(|m| m.url.as_str()))
            .collect();
        prop_assert_eq!(ranked.total_count, distinct.len());
        prop_assert_eq!(ranked.results.len(), distinct.len());
    }

    #[test]
    fn prop_sorted_descending_and_repeatable(pages in source_pages(), query in "[a-z]{0,6}") {
        let first = rank_results(&pages, &[], &query);
        let second = rank_results(&pages, &[], &query);

        prop_assert!(first.results.windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_library_count_matches_flags(pages in source_pages()) {
        let library: Vec<SearchManga> = pages
            .iter()
            .flat_map(|page| page.items.iter().take(1).cloned())
            .collect();
        let ranked = rank_results(&pages, &library, "a");

        let flagged = ranked.results.iter().filter(|r| r.is_in_library).count();
        prop_assert_eq!(ranked.library_count, flagged);
    }
}
