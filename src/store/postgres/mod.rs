//! PostgreSQL store.
//!
//! Nested document parts live in JSONB columns; scalar lists in arrays.
//! Schema: `migrations/`.

mod contacts;
mod orders;
mod products;
mod testimonials;
mod users;

use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Clamp a count or page value into Postgres' `BIGINT`.
pub(super) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `COUNT(*)` results are never negative.
pub(super) fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// `col = EXCLUDED.col, ...` for an upsert, skipping immutable columns.
pub(super) fn excluded_assignments(columns: &[&str], immutable: &[&str]) -> String {
    columns
        .iter()
        .filter(|c| !immutable.contains(c))
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
