// tests/feed_merge.rs
use chrono::{Duration, TimeZone, Utc};
use ransomwatch_feed::feed::parser::parse_feed;
use ransomwatch_feed::ingest::{normalize_post, transform};
use ransomwatch_feed::{merge, title_key, DisclosurePost, FeedItem, RawPost};
use std::collections::HashSet;

fn post(g: &str, t: &str, days_after_new_year: i64) -> DisclosurePost {
    DisclosurePost {
        group_name: g.into(),
        post_title: t.into(),
        discovered: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days_after_new_year),
    }
}

fn assert_sorted_desc(items: &[FeedItem]) {
    for pair in items.windows(2) {
        assert!(
            pair[0].published_at() >= pair[1].published_at(),
            "{} ({}) should not precede {} ({})",
            pair[0].title,
            pair[0].pub_date,
            pair[1].title,
            pair[1].pub_date
        );
    }
}

#[test]
fn known_post_is_deduplicated_and_new_one_added() {
    let prior = parse_feed(include_str!("fixtures/prior_feed.xml")).unwrap();

    let batch = vec![
        RawPost {
            group_name: "A".into(),
            post_title: "X".into(),
            discovered: "2024-01-01".into(),
        },
        RawPost {
            group_name: "C".into(),
            post_title: "Z".into(),
            discovered: "2024-02-01".into(),
        },
    ];
    let (posts, _) = transform(&batch, 20);

    let out = merge(&posts, prior, 20);
    let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["C: Z", "A: X", "B: Y"]);
    assert_eq!(out.duplicates, 1);
    assert_eq!(out.added, 1);
    // the prior copy of "A: X" is carried verbatim
    assert_eq!(out.items[1].pub_date, "Tue, 01 Jan 2024");
    assert_eq!(out.items[1].description, "Group: A, Title: X");
}

#[test]
fn output_titles_are_unique() {
    let prior: Vec<FeedItem> = (0..10)
        .map(|i| FeedItem::from_post(&post("g", &format!("p{i}"), i)))
        .collect();
    // overlaps prior on p5..p9, and repeats p12 within itself
    let batch: Vec<DisclosurePost> = (5..15)
        .chain([12])
        .map(|i| post("g", &format!("p{i}"), i + 30))
        .collect();

    let out = merge(&batch, prior, 20);
    let unique: HashSet<_> = out.items.iter().map(|i| i.title.clone()).collect();
    assert_eq!(unique.len(), out.items.len());
    assert_eq!(out.duplicates, 5);
    assert_eq!(out.added, 5);
    assert_eq!(out.items.len(), 15);
}

#[test]
fn output_is_bounded() {
    let prior: Vec<FeedItem> = (0..20)
        .map(|i| FeedItem::from_post(&post("old", &format!("p{i}"), i)))
        .collect();
    let batch: Vec<DisclosurePost> = (0..20).map(|i| post("new", &format!("p{i}"), 100 + i)).collect();

    let out = merge(&batch, prior, 20);
    assert_eq!(out.items.len(), 20);
    assert!(out.items.iter().all(|i| i.title.starts_with("new: ")));
    assert_sorted_desc(&out.items);
}

#[test]
fn output_is_newest_first() {
    let prior = vec![
        FeedItem::from_post(&post("a", "mid", 10)),
        FeedItem::from_post(&post("a", "oldest", 1)),
    ];
    let batch = vec![post("b", "newest", 20), post("b", "older", 5)];
    let out = merge(&batch, prior, 20);
    let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["b: newest", "a: mid", "b: older", "a: oldest"]);
    assert_sorted_desc(&out.items);
}

#[test]
fn empty_batch_keeps_prior_untouched() {
    let prior: Vec<FeedItem> = (0..5)
        .rev()
        .map(|i| FeedItem::from_post(&post("g", &format!("p{i}"), i)))
        .collect();
    let out = merge(&[], prior.clone(), 20);
    assert_eq!(out.items, prior);
    assert_eq!(out.added, 0);
}

#[test]
fn dedup_key_matches_normalized_title() {
    let p = normalize_post(&RawPost {
        group_name: "black basta".into(),
        post_title: "acme corp".into(),
        discovered: "2024-01-01".into(),
    })
    .unwrap();
    assert_eq!(FeedItem::from_post(&p).title, title_key("black_basta", "acme_corp"));
    assert_eq!(title_key("black_basta", "acme_corp"), "black_basta: acme_corp");
}
