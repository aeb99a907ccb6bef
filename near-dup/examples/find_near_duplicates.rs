use near_dup::{DuplicateSearcher, SearchConfig, Strategy};

fn main() {
    let documents = vec![
        "Welcome to Jimbocho, the town of books and curry!",
        "Welcome to Jimbocho, the town of books and curry!",
        "Welcome to Jimbocho, the city of books and curry!",
        "We welcome you to Jimbocho, the town of books and curry.",
        "",
    ];

    // Creates a searcher narrowing candidates with 8 bands of 16 bits (with seed value 42).
    let searcher = DuplicateSearcher::new(
        SearchConfig::new()
            .with_strategy(Strategy::Indexed)
            .with_bands(8, 16)
            .with_seed(Some(42)),
    )
    .unwrap()
    .build_fingerprints_in_parallel(documents.iter());

    for (i, fp) in searcher.fingerprints().iter().enumerate() {
        println!("{i}: {fp}");
    }

    // The exact copy of document 0 is always found.
    assert!(searcher.count(0, 0).unwrap() >= 1);

    // Lists all pairs within 16 differing bits.
    for (i, j, dist) in searcher.similar_pairs(16) {
        println!("{i},{j},{dist}");
    }
}
