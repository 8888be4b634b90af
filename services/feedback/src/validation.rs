//! Submission validation
//!
//! Turns a decoded [`SubmissionRequest`] into a [`Record`] or reports every
//! failing field at once. The aggregator never sees unvalidated input.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::aggregator::Record;
use crate::models::{RatingInput, SubmissionRequest};

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;

static LOCAL_PART: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$").ok()
});

static DOMAIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$").ok()
});

// i64::MAX + 1, exactly representable
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the field
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Field names in the order they were rejected
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a submission and build the record the aggregator stores
pub fn validate(request: SubmissionRequest) -> Result<Record, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required_text(&mut errors, "name", request.name);
    let email = required_text(&mut errors, "email", request.email);
    if let Some(email) = &email
        && !is_valid_email(email)
    {
        errors.push("email", "value is not a valid email address");
    }
    let product_rating = rating(&mut errors, "productRating", request.product_rating);
    let service_rating = rating(&mut errors, "serviceRating", request.service_rating);
    let recommend_likelihood =
        required_text(&mut errors, "recommendLikelihood", request.recommend_likelihood);

    match (name, email, product_rating, service_rating, recommend_likelihood) {
        (Some(name), Some(email), Some(product_rating), Some(service_rating), Some(recommend_likelihood))
            if errors.is_empty() =>
        {
            Ok(Record {
                name,
                email,
                product_rating,
                service_rating,
                recommend_likelihood,
            })
        }
        _ => Err(errors),
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    if value.is_none() {
        errors.push(field, "field required");
    }
    value
}

fn rating(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<RatingInput>,
) -> Option<i64> {
    let Some(value) = value else {
        errors.push(field, "field required");
        return None;
    };
    let parsed = match value {
        RatingInput::Integer(n) => Some(n),
        RatingInput::Number(n) => integral_float(n),
        RatingInput::Flag(flag) => Some(i64::from(flag)),
        RatingInput::Text(text) => integral_text(text.trim()),
    };
    if parsed.is_none() {
        errors.push(field, "value is not a valid integer");
    }
    parsed
}

/// `5.0` is a rating, `4.5` is not
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral_float(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < I64_UPPER_BOUND)
        .then_some(n as i64)
}

/// Integer text, optionally with an all-zero fraction such as `"5.0"`
fn integral_text(text: &str) -> Option<i64> {
    match text.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty() && !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') =>
        {
            whole.parse().ok()
        }
        Some(_) => None,
        None => text.parse().ok(),
    }
}

/// Syntactic email check: dot-atom local part, multi-label domain
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }
    match (LOCAL_PART.as_ref(), DOMAIN.as_ref()) {
        (Some(local_part), Some(domain_part)) => {
            local_part.is_match(local) && domain_part.is_match(domain)
        }
        _ => false,
    }
}
