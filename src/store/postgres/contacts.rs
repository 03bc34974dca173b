use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{to_u64, PgStore};
use crate::domain::{Contact, ContactStatus};
use crate::error::AppResult;
use crate::store::ContactStore;

const CONTACT_SELECT: &str =
    "SELECT id, name, email, phone, subject, message, status, created_at FROM contacts";

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    subject: Option<String>,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(r: ContactRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            subject: r.subject,
            message: r.message,
            status: ContactStatus::parse(&r.status).unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn save(&self, c: &Contact) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, phone, subject, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET status = EXCLUDED.status
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.email)
        .bind(&c.phone)
        .bind(&c.subject)
        .bind(&c.message)
        .bind(c.status.as_str())
        .bind(c.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let row: Option<ContactRow> = sqlx::query_as(&format!("{CONTACT_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Contact::from))
    }

    async fn list(&self) -> AppResult<Vec<Contact>> {
        let rows: Vec<ContactRow> = sqlx::query_as(&format!("{CONTACT_SELECT} ORDER BY created_at DESC, id ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_u64(total))
    }
}
