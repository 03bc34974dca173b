//! Persistence behind one trait per entity.
//!
//! [`Store`] bundles the trait objects and is handed to the HTTP layer
//! through the application state. `save` is an upsert keyed by id
//! everywhere; unique-key violations surface as [`AppError::Conflict`].
//!
//! [`AppError::Conflict`]: crate::error::AppError::Conflict

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::catalog::{FilterValues, Page, PageRequest, ProductFilter, ProductQuery};
use crate::domain::{Contact, Order, Product, Testimonial, User};
use crate::error::AppResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn save(&self, product: &Product) -> AppResult<()>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>>;
    /// Products that still exist, in no particular order.
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Product>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn list(&self, query: &ProductQuery) -> AppResult<Page<Product>>;
    /// Best matches for quick search, newest first.
    async fn search(&self, filter: &ProductFilter, limit: u64) -> AppResult<Vec<Product>>;
    async fn filter_values(&self) -> AppResult<FilterValues>;
    async fn count(&self) -> AppResult<u64>;
    async fn count_low_stock(&self, threshold: i32) -> AppResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn save(&self, user: &User) -> AppResult<()>;
    async fn find(&self, id: Uuid) -> AppResult<Option<User>>;
    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
    async fn list(&self) -> AppResult<Vec<User>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<u64>;
}

/// Order aggregates for the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrderStats {
    pub count: u64,
    pub revenue: f64,
    pub pending: u64,
    pub delivered: u64,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, order: &Order) -> AppResult<()>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Order>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// Newest first; `user_id = None` lists every order.
    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<Page<Order>>;
    async fn all_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;
    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>>;
    async fn stats(&self) -> AppResult<OrderStats>;
}

#[async_trait]
pub trait TestimonialStore: Send + Sync {
    async fn save(&self, testimonial: &Testimonial) -> AppResult<()>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Testimonial>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Testimonial>>;
    /// Newest first.
    async fn list(&self, approved_only: bool) -> AppResult<Vec<Testimonial>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn save(&self, contact: &Contact) -> AppResult<()>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Contact>>;
    /// Newest first.
    async fn list(&self) -> AppResult<Vec<Contact>>;
    async fn count(&self) -> AppResult<u64>;
}

/// Handle to every entity store.
#[derive(Clone)]
pub struct Store {
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
    pub orders: Arc<dyn OrderStore>,
    pub testimonials: Arc<dyn TestimonialStore>,
    pub contacts: Arc<dyn ContactStore>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    /// Process-local store; contents are lost on exit.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::default()))
    }

    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ProductStore + UserStore + OrderStore + TestimonialStore + ContactStore + 'static,
    {
        Self {
            products: backend.clone(),
            users: backend.clone(),
            orders: backend.clone(),
            testimonials: backend.clone(),
            contacts: backend,
        }
    }
}
