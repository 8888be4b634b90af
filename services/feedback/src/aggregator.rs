//! Bounded sliding-window aggregator
//!
//! Keeps the most recent `capacity` feedback records together with running
//! rating sums, so snapshots are O(1) regardless of window size.
//! All state sits behind one `RwLock`: `submit` is the only writer.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use tracing::trace;

/// Window size used by the service
pub const WINDOW_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// One accepted feedback submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub email: String,
    pub product_rating: i64,
    pub service_rating: i64,
    pub recommend_likelihood: String,
}

/// Aggregate view over the current window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of records currently held
    pub records_count: usize,
    /// Mean product rating, rounded to 2 decimals
    pub average_product_rating: f64,
    /// Mean service rating, rounded to 2 decimals
    pub average_service_rating: f64,
}

impl Stats {
    /// Snapshot of an empty window
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records_count: 0,
            average_product_rating: 0.0,
            average_service_rating: 0.0,
        }
    }
}

#[derive(Debug)]
struct Window {
    records: VecDeque<Record>,
    // i128 so a full window of i64::MAX ratings cannot overflow
    product_sum: i128,
    service_sum: i128,
}

/// Fixed-capacity FIFO of records with running rating sums
#[derive(Debug)]
pub struct BoundedAggregator {
    capacity: NonZeroUsize,
    window: RwLock<Window>,
}

impl Default for BoundedAggregator {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}

impl BoundedAggregator {
    /// Create an empty aggregator holding at most `capacity` records
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            window: RwLock::new(Window {
                records: VecDeque::with_capacity(capacity.get()),
                product_sum: 0,
                service_sum: 0,
            }),
        }
    }

    /// Accept a validated record, evicting the oldest one when full
    pub fn submit(&self, record: Record) {
        let mut window = self.window.write();

        if window.records.len() == self.capacity.get()
            && let Some(evicted) = window.records.pop_front()
        {
            window.product_sum -= i128::from(evicted.product_rating);
            window.service_sum -= i128::from(evicted.service_rating);
            trace!(
                product_rating = evicted.product_rating,
                service_rating = evicted.service_rating,
                "Evicted oldest record"
            );
        }

        window.product_sum += i128::from(record.product_rating);
        window.service_sum += i128::from(record.service_rating);
        window.records.push_back(record);
    }

    /// Current record count and rounded averages
    #[must_use]
    pub fn snapshot(&self) -> Stats {
        let window = self.window.read();
        let count = window.records.len();
        if count == 0 {
            return Stats::empty();
        }

        Stats {
            records_count: count,
            average_product_rating: rounded_mean(window.product_sum, count),
            average_service_rating: rounded_mean(window.service_sum, count),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.read().records.is_empty()
    }

    /// Copy of the window contents, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.window.read().records.iter().cloned().collect()
    }
}

/// Mean rounded to 2 decimals, half away from zero
#[allow(clippy::cast_precision_loss)]
fn rounded_mean(sum: i128, count: usize) -> f64 {
    let mean = sum as f64 / count as f64;
    (mean * 100.0).round() / 100.0
}
