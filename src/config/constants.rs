//! Business and server constants.

// =============================================================================
// Pagination
// =============================================================================

/// Default page size for the product listing
pub const DEFAULT_PRODUCT_PAGE_SIZE: u64 = 20;

/// Default page size for order listings
pub const DEFAULT_ORDER_PAGE_SIZE: u64 = 10;

/// Upper bound on any requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default result count for the quick search endpoint
pub const DEFAULT_SEARCH_LIMIT: u64 = 10;

/// Queries shorter than this (after trimming) return no suggestions
pub const MIN_SEARCH_LENGTH: usize = 2;

// =============================================================================
// Catalog
// =============================================================================

/// Width of one rating bucket: bucket `r` covers `[r, r + RATING_BUCKET_WIDTH)`
pub const RATING_BUCKET_WIDTH: f64 = 1.0;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Review and testimonial comments are cut to this many characters
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Products with stock strictly below this count as low stock
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Number of orders in the dashboard's recent list
pub const DASHBOARD_RECENT_ORDERS: u64 = 5;

pub const DEFAULT_CURRENCY: &str = "EGP";

/// Price range reported when the catalog is empty
pub const FALLBACK_PRICE_RANGE: (f64, f64) = (0.0, 1000.0);

// =============================================================================
// Authentication
// =============================================================================

pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24 * 7;

pub const MIN_JWT_SECRET_LENGTH: usize = 32;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted as the "special character" of the password policy
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Server
// =============================================================================

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Maximum accepted request body
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 200 * 1024;

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
