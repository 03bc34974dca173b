//! Bearer tokens for the HTTP layer.

mod token;

pub use token::{Claims, TokenService};
