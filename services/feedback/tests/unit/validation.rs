//! Submission validation unit tests

use pretty_assertions::assert_eq;
use rstest::*;

use super::helpers::create_test_submission;
use feedback_service::{
    models::{RatingInput, SubmissionRequest},
    validation::validate,
};

#[rstest]
fn test_valid_submission_builds_record() {
    crate::init_test_env();
    let record = validate(create_test_submission()).unwrap();
    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.email, "jane@example.com");
    assert_eq!(record.product_rating, 5);
    assert_eq!(record.service_rating, 4);
    assert_eq!(record.recommend_likelihood, "likely");
}

#[rstest]
#[case(RatingInput::Integer(3), 3)]
#[case(RatingInput::Integer(-2), -2)]
#[case(RatingInput::Text("7".to_string()), 7)]
#[case(RatingInput::Text(" 4 ".to_string()), 4)]
#[case(RatingInput::Text("-1".to_string()), -1)]
#[case(RatingInput::Text("5.0".to_string()), 5)]
#[case(RatingInput::Number(5.0), 5)]
#[case(RatingInput::Number(-2.0), -2)]
#[case(RatingInput::Flag(true), 1)]
#[case(RatingInput::Flag(false), 0)]
fn test_rating_coercion(#[case] input: RatingInput, #[case] expected: i64) {
    let request = SubmissionRequest {
        product_rating: Some(input),
        ..create_test_submission()
    };
    assert_eq!(validate(request).unwrap().product_rating, expected);
}

#[rstest]
#[case("five")]
#[case("4.5")]
#[case("5.")]
#[case("")]
fn test_non_integer_rating_text_rejected(#[case] text: &str) {
    let request = SubmissionRequest {
        service_rating: Some(RatingInput::Text(text.to_string())),
        ..create_test_submission()
    };
    let errors = validate(request).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["serviceRating"]);
}

#[rstest]
#[case("not-an-email")]
#[case("jane@localhost")]
#[case("jane@@example.com")]
fn test_invalid_email_rejected(#[case] email: &str) {
    let request = SubmissionRequest {
        email: Some(email.to_string()),
        ..create_test_submission()
    };
    let errors = validate(request).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);
    assert_eq!(
        errors.errors()[0].message,
        "value is not a valid email address"
    );
}

#[rstest]
fn test_all_missing_fields_reported_together() {
    let errors = validate(SubmissionRequest::default()).unwrap_err();
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![
            "name",
            "email",
            "productRating",
            "serviceRating",
            "recommendLikelihood"
        ]
    );
    assert!(errors.errors().iter().all(|e| e.message == "field required"));
}

#[rstest]
fn test_decodes_frontend_payload_with_string_ratings() {
    let request: SubmissionRequest = serde_json::from_value(serde_json::json!({
        "name": "Sam",
        "email": "sam@example.com",
        "productRating": "5",
        "serviceRating": 3,
        "recommendLikelihood": "neutral",
    }))
    .unwrap();

    let record = validate(request).unwrap();
    assert_eq!((record.product_rating, record.service_rating), (5, 3));
}

#[rstest]
#[case(4.5)]
#[case(f64::MAX)]
fn test_fractional_or_out_of_range_number_rejected(#[case] value: f64) {
    let request = SubmissionRequest {
        product_rating: Some(RatingInput::Number(value)),
        ..create_test_submission()
    };
    let errors = validate(request).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["productRating"]);
    assert_eq!(errors.errors()[0].message, "value is not a valid integer");
}

#[rstest]
fn test_decodes_numeric_and_boolean_ratings() {
    let request: SubmissionRequest = serde_json::from_value(serde_json::json!({
        "name": "Sam",
        "email": "sam@example.com",
        "productRating": 5.0,
        "serviceRating": true,
        "recommendLikelihood": "neutral",
    }))
    .unwrap();

    assert_eq!(request.product_rating, Some(RatingInput::Number(5.0)));
    assert_eq!(request.service_rating, Some(RatingInput::Flag(true)));
    let record = validate(request).unwrap();
    assert_eq!((record.product_rating, record.service_rating), (5, 1));
}
