//! Domain model: entities, value objects and their rules. No I/O here.

pub mod aggregates;
pub mod password;
pub mod value_objects;

pub use aggregates::*;
pub use password::Password;
pub use value_objects::{normalize_email, parse_email, Rating, Sku, Slug};
