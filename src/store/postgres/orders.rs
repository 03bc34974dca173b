use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use super::{to_i64, to_u64, PgStore};
use crate::catalog::{Page, PageRequest};
use crate::domain::{Order, OrderLine, OrderStatus, ShippingAddress};
use crate::error::AppResult;
use crate::store::{OrderStats, OrderStore};

const ORDER_SELECT: &str = "SELECT id, user_id, products, status, shipping_address, payment_method, notes, \
     total_price, created_at, updated_at FROM orders";

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    products: Json<Vec<OrderLine>>,
    status: String,
    shipping_address: Json<ShippingAddress>,
    payment_method: String,
    notes: String,
    total_price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            products: r.products.0,
            status: OrderStatus::parse(&r.status).unwrap_or_default(),
            shipping_address: r.shipping_address.0,
            payment_method: r.payment_method,
            notes: r.notes,
            total_price: r.total_price,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn save(&self, order: &Order) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, products, status, shipping_address, payment_method, notes, total_price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                products = EXCLUDED.products,
                status = EXCLUDED.status,
                shipping_address = EXCLUDED.shipping_address,
                payment_method = EXCLUDED.payment_method,
                notes = EXCLUDED.notes,
                total_price = EXCLUDED.total_price,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(Json(&order.products))
        .bind(order.status.as_str())
        .bind(Json(&order.shipping_address))
        .bind(&order.payment_method)
        .bind(&order.notes)
        .bind(order.total_price)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{ORDER_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Order::from))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<Page<Order>> {
        // NULL user filter matches every order
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE ($1::uuid IS NULL OR user_id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{ORDER_SELECT} WHERE ($1::uuid IS NULL OR user_id = $1) \
             ORDER BY created_at DESC, id ASC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(to_i64(page.limit))
        .bind(to_i64(page.offset()))
        .fetch_all(&self.pool)
        .await?;
        Ok(Page { items: rows.into_iter().map(Order::from).collect(), total: to_u64(total) })
    }

    async fn all_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("{ORDER_SELECT} WHERE user_id = $1 ORDER BY created_at DESC, id ASC"))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!("{ORDER_SELECT} ORDER BY created_at DESC, id ASC LIMIT $1"))
            .bind(to_i64(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn stats(&self) -> AppResult<OrderStats> {
        let (count, revenue, pending, delivered): (i64, f64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(total_price), 0)::float8,
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'delivered')
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(OrderStats {
            count: to_u64(count),
            revenue,
            pending: to_u64(pending),
            delivered: to_u64(delivered),
        })
    }
}
