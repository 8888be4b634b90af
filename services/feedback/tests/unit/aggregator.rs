//! Bounded aggregator unit tests

use pretty_assertions::assert_eq;
use rstest::*;

use super::helpers::{capacity, create_test_record};
use crate::assertions::assert_window_consistent;
use feedback_service::{BoundedAggregator, Stats, WINDOW_CAPACITY};

#[fixture]
fn aggregator() -> BoundedAggregator {
    crate::init_test_env();
    BoundedAggregator::default()
}

#[rstest]
fn test_fresh_aggregator_reports_zeros(aggregator: BoundedAggregator) {
    assert_eq!(
        aggregator.snapshot(),
        Stats {
            records_count: 0,
            average_product_rating: 0.0,
            average_service_rating: 0.0,
        }
    );
    assert_eq!(aggregator.capacity(), WINDOW_CAPACITY);
}

#[rstest]
fn test_averages_over_three_records(aggregator: BoundedAggregator) {
    for (i, (product, service)) in [(5, 4), (3, 4), (4, 5)].into_iter().enumerate() {
        aggregator.submit(create_test_record(i, product, service));
    }

    let stats = aggregator.snapshot();
    assert_eq!(stats.records_count, 3);
    assert_eq!(stats.average_product_rating, 4.0);
    assert_eq!(stats.average_service_rating, 4.33);
}

#[rstest]
fn test_eviction_drops_oldest_from_averages() {
    let aggregator = BoundedAggregator::new(capacity(2));
    aggregator.submit(create_test_record(0, 5, 5));
    aggregator.submit(create_test_record(1, 3, 3));
    aggregator.submit(create_test_record(2, 1, 1));

    let stats = aggregator.snapshot();
    assert_eq!(stats.records_count, 2);
    assert_eq!(stats.average_product_rating, 2.0);
    assert_eq!(stats.average_service_rating, 2.0);
}

#[rstest]
fn test_overflow_by_one_keeps_last_capacity_records_in_order(aggregator: BoundedAggregator) {
    let total = WINDOW_CAPACITY.get() + 1;
    for i in 0..total {
        aggregator.submit(create_test_record(i, 1, 1));
    }

    let emails: Vec<String> = aggregator.records().into_iter().map(|r| r.email).collect();
    let expected: Vec<String> = (1..total).map(|i| format!("user{i}@example.com")).collect();
    assert_eq!(emails, expected);
    assert!(!emails.contains(&"user0@example.com".to_string()));
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(100)]
fn test_capacity_and_sums_hold_after_every_submit(#[case] window: usize) {
    let aggregator = BoundedAggregator::new(capacity(window));
    for i in 0..(window * 3 + 5) {
        // Mix of ordinary, zero and negative ratings
        let product = i64::try_from(i % 11).unwrap() - 3;
        let service = i64::try_from((i * 7) % 5).unwrap();
        aggregator.submit(create_test_record(i, product, service));

        assert_eq!(aggregator.len(), (i + 1).min(window));
        assert_window_consistent(&aggregator);
    }
}

#[rstest]
fn test_snapshot_is_read_only(aggregator: BoundedAggregator) {
    aggregator.submit(create_test_record(0, 2, 3));
    let first = aggregator.snapshot();
    let second = aggregator.snapshot();
    assert_eq!(first, second);
    assert_eq!(aggregator.len(), 1);
}

#[rstest]
fn test_independent_instances_do_not_share_state() {
    let left = BoundedAggregator::new(capacity(5));
    let right = BoundedAggregator::new(capacity(5));
    left.submit(create_test_record(0, 5, 5));

    assert_eq!(left.len(), 1);
    assert!(right.is_empty());
    assert_eq!(right.snapshot(), Stats::empty());
}

#[rstest]
fn test_stats_serialize_with_wire_names() {
    let stats = Stats {
        records_count: 3,
        average_product_rating: 4.0,
        average_service_rating: 4.33,
    };
    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "recordsCount": 3,
            "averageProductRating": 4.0,
            "averageServiceRating": 4.33,
        })
    );
}
