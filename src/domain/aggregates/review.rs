//! Product reviews: one per user per product, moderated before they count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;
use crate::domain::value_objects::{sanitize_comment, Rating};
use crate::error::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub comment: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Whether a submission created a review or replaced the user's earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewSubmission { Created, Updated }

impl ReviewSubmission {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created => "Review submitted and pending approval",
            Self::Updated => "Review updated and pending approval",
        }
    }
}

/// Aggregate over approved reviews only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub total: i32,
}

impl RatingSummary {
    pub fn of(reviews: &[Review]) -> Self {
        let (sum, count) = reviews
            .iter()
            .filter(|r| r.approved)
            .fold((0.0, 0i32), |(sum, n), r| (sum + r.rating, n + 1));
        Self {
            average: if count > 0 { sum / f64::from(count) } else { 0.0 },
            total: count,
        }
    }
}

impl Product {
    /// Insert or replace `user_id`'s review. Edits go back to moderation.
    pub fn submit_review(&mut self, user_id: Uuid, rating: Rating, comment: Option<&str>) -> ReviewSubmission {
        let comment = sanitize_comment(comment);
        let now = Utc::now();
        let outcome = match self.reviews.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => {
                existing.rating = rating.value();
                existing.comment = comment;
                existing.approved = false;
                existing.created_at = now;
                ReviewSubmission::Updated
            }
            None => {
                self.reviews.push(Review {
                    id: Uuid::now_v7(),
                    user_id,
                    rating: rating.value(),
                    comment,
                    approved: false,
                    created_at: now,
                });
                ReviewSubmission::Created
            }
        };
        // an edited review may have been approved before
        self.refresh_rating();
        outcome
    }

    pub fn approve_review(&mut self, review_id: Uuid) -> AppResult<()> {
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| AppError::not_found("Review"))?;
        review.approved = true;
        self.refresh_rating();
        Ok(())
    }

    pub fn approved_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| r.approved)
    }

    pub fn pending_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| !r.approved)
    }

    /// Catalog-facing copy: reviews awaiting moderation are dropped.
    pub fn without_pending_reviews(mut self) -> Self {
        self.reviews.retain(|r| r.approved);
        self
    }

    fn refresh_rating(&mut self) {
        let summary = RatingSummary::of(&self.reviews);
        self.average_rating = summary.average;
        self.total_reviews = summary.total;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::tests::new_product;

    fn product() -> Product {
        Product::create(new_product("Runner", "RU-1")).unwrap()
    }

    fn rating(v: f64) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn test_submit_is_upsert_per_user() {
        let mut p = product();
        let user = Uuid::new_v4();
        assert_eq!(p.submit_review(user, rating(4.0), Some("good")), ReviewSubmission::Created);
        let first_id = p.reviews[0].id;
        assert_eq!(p.submit_review(user, rating(2.0), Some("  meh  ")), ReviewSubmission::Updated);
        assert_eq!(p.reviews.len(), 1);
        assert_eq!(p.reviews[0].id, first_id);
        assert_eq!(p.reviews[0].rating, 2.0);
        assert_eq!(p.reviews[0].comment, "meh");
        assert!(!p.reviews[0].approved);
    }

    #[test]
    fn test_average_counts_only_approved() {
        let mut p = product();
        let users: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        p.submit_review(users[0], rating(5.0), None);
        p.submit_review(users[1], rating(3.0), None);
        p.submit_review(users[2], rating(1.0), None);
        assert_eq!((p.average_rating, p.total_reviews), (0.0, 0));

        let ids: Vec<Uuid> = p.reviews.iter().map(|r| r.id).collect();
        p.approve_review(ids[0]).unwrap();
        p.approve_review(ids[1]).unwrap();
        assert_eq!(p.total_reviews, 2);
        assert_eq!(p.average_rating, 4.0);
        assert_eq!(p.approved_reviews().count(), 2);
    }

    #[test]
    fn test_edit_after_approval_requires_moderation_again() {
        let mut p = product();
        let user = Uuid::new_v4();
        p.submit_review(user, rating(5.0), None);
        let id = p.reviews[0].id;
        p.approve_review(id).unwrap();
        assert_eq!(p.total_reviews, 1);

        p.submit_review(user, rating(1.0), None);
        assert_eq!(p.total_reviews, 0);
        assert_eq!(p.average_rating, 0.0);
    }

    #[test]
    fn test_public_copy_hides_pending() {
        let mut p = product();
        p.submit_review(Uuid::new_v4(), rating(5.0), Some("shown"));
        p.submit_review(Uuid::new_v4(), rating(1.0), Some("hidden"));
        let approved = p.reviews[0].id;
        p.approve_review(approved).unwrap();
        assert_eq!(p.pending_reviews().count(), 1);

        let public = p.clone().without_pending_reviews();
        assert_eq!(public.reviews.len(), 1);
        assert_eq!(public.reviews[0].id, approved);
        assert_eq!(public.total_reviews, 1);
        assert_eq!(p.reviews.len(), 2);
    }

    #[test]
    fn test_approve_unknown_review() {
        let mut p = product();
        assert!(matches!(p.approve_review(Uuid::new_v4()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_summary_of_empty() {
        assert_eq!(RatingSummary::of(&[]), RatingSummary { average: 0.0, total: 0 });
    }
}
