//! Customer testimonials, one per email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::value_objects::{parse_email, sanitize_comment, Rating};
use crate::error::AppResult;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: f64,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct TestimonialSubmission {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// A submission after trimming, lowercasing and range checks.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedTestimonial {
    pub name: String,
    pub email: String,
    pub rating: Rating,
    pub comment: String,
}

impl TestimonialSubmission {
    pub fn normalize(self) -> AppResult<NormalizedTestimonial> {
        let email = parse_email(&self.email)?;
        let rating = Rating::required(self.rating)?;
        Ok(NormalizedTestimonial {
            name: self.name.trim().to_string(),
            email,
            rating,
            comment: sanitize_comment(self.comment.as_deref()),
        })
    }
}

impl Testimonial {
    pub fn create(input: NormalizedTestimonial) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            rating: input.rating.value(),
            comment: input.comment,
            is_approved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite with a new submission from the same email and send it back to moderation.
    pub fn resubmit(&mut self, input: NormalizedTestimonial) {
        self.name = input.name;
        self.rating = input.rating.value();
        self.comment = input.comment;
        self.is_approved = false;
        self.updated_at = Utc::now();
    }

    pub fn set_approved(&mut self, approved: bool) {
        self.is_approved = approved;
        self.updated_at = Utc::now();
    }
}
