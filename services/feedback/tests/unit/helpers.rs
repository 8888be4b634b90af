//! Test helpers and utilities

use feedback_service::{
    Record,
    models::{RatingInput, SubmissionRequest},
};
use std::num::NonZeroUsize;

/// Record with the given ratings and a unique email
pub fn create_test_record(id: usize, product_rating: i64, service_rating: i64) -> Record {
    Record {
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        product_rating,
        service_rating,
        recommend_likelihood: "very-likely".to_string(),
    }
}

/// Fully populated submission that passes validation
pub fn create_test_submission() -> SubmissionRequest {
    SubmissionRequest {
        name: Some("Jane Doe".to_string()),
        email: Some("jane@example.com".to_string()),
        product_rating: Some(RatingInput::Integer(5)),
        service_rating: Some(RatingInput::Text("4".to_string())),
        recommend_likelihood: Some("likely".to_string()),
    }
}

pub fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("test capacity must be non-zero")
}
