//! API handlers for the feedback endpoints

pub mod feedback;
pub mod health;

pub use feedback::FeedbackHandlers;
pub use health::HealthHandlers;
