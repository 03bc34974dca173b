//! Storefront backend
//!
//! Bilingual product catalog with a JSON/REST surface.
//!
//! ## Features
//! - Product catalog with filtering, search and filter options
//! - Moderated product reviews with approved-only rating aggregates
//! - Stock-checked shopping cart and wishlist
//! - Orders with denormalized line snapshots
//! - Testimonials deduplicated by email, contact messages
//! - Admin dashboard aggregates
//!
//! ## Layout
//! - `domain`: entities and their rules
//! - `catalog`: product filter parsing, matching, sorting and pagination
//! - `store`: storage traits with PostgreSQL and in-memory backends
//! - `auth`: bearer tokens
//! - `api`: axum handlers, middleware and routes
//! - `commands`: `serve`, `migrate` and `seed` entry points

pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod store;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::Store;
