use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::domain::Testimonial;
use crate::error::AppResult;
use crate::store::TestimonialStore;

const TESTIMONIAL_SELECT: &str =
    "SELECT id, name, email, rating, comment, is_approved, created_at, updated_at FROM testimonials";

#[derive(sqlx::FromRow)]
struct TestimonialRow {
    id: Uuid,
    name: String,
    email: String,
    rating: f64,
    comment: String,
    is_approved: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<TestimonialRow> for Testimonial {
    fn from(r: TestimonialRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            rating: r.rating,
            comment: r.comment,
            is_approved: r.is_approved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl TestimonialStore for PgStore {
    async fn save(&self, t: &Testimonial) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO testimonials (id, name, email, rating, comment, is_approved, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                rating = EXCLUDED.rating,
                comment = EXCLUDED.comment,
                is_approved = EXCLUDED.is_approved,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(t.id)
        .bind(&t.name)
        .bind(&t.email)
        .bind(t.rating)
        .bind(&t.comment)
        .bind(t.is_approved)
        .bind(t.created_at)
        .bind(t.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Testimonial>> {
        let row: Option<TestimonialRow> = sqlx::query_as(&format!("{TESTIMONIAL_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Testimonial::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Testimonial>> {
        let row: Option<TestimonialRow> = sqlx::query_as(&format!("{TESTIMONIAL_SELECT} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Testimonial::from))
    }

    async fn list(&self, approved_only: bool) -> AppResult<Vec<Testimonial>> {
        let rows: Vec<TestimonialRow> = sqlx::query_as(&format!(
            "{TESTIMONIAL_SELECT} WHERE (NOT $1 OR is_approved) ORDER BY created_at DESC, id ASC"
        ))
        .bind(approved_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Testimonial::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
