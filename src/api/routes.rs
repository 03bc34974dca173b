//! Application route configuration.
//!
//! Routes are grouped by access level. Each group gets its guards through
//! `route_layer`, so the groups can share paths with different methods
//! (e.g. `GET /api/products/:id` is public, `PUT` on the same path is admin).

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{auth, cart, contact, dashboard, orders, products, testimonials, users, wishlist};
use super::middleware::{admin_middleware, auth_middleware};
use super::AppState;
use crate::config::Config;
use crate::error::AppError;

pub fn create_router(state: AppState) -> Router {
    let authed = authed_routes().route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
    let admin = admin_routes()
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes())
        .merge(authed)
        .merge(admin)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/products", get(products::list_products))
        .route("/api/products/search", get(products::search_products))
        .route("/api/products/filter-options", get(products::filter_options))
        .route("/api/products/:id", get(products::get_product))
        .route("/api/products/:id/reviews", get(products::list_reviews))
        .route("/api/customer-say", post(testimonials::submit_testimonial))
        .route("/api/customer-say/approved", get(testimonials::approved_testimonials))
        .route("/api/contact", post(contact::create_contact))
}

fn authed_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        // Account
        .route("/api/users/profile", get(users::get_profile).put(users::update_profile))
        .route("/api/users/addresses", post(users::add_address))
        .route("/api/users/addresses/:addressId", delete(users::delete_address))
        // Cart
        .route("/api/cart", get(cart::get_cart).post(cart::add_to_cart).delete(cart::clear_cart))
        .route("/api/cart/:productId", put(cart::update_cart_item).delete(cart::remove_from_cart))
        .route("/api/users/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/api/users/cart/:productId", delete(cart::remove_from_cart))
        // Wishlist
        .route("/api/wishlist", get(wishlist::get_wishlist))
        .route("/api/wishlist/sync", post(wishlist::sync_wishlist))
        .route("/api/wishlist/add/:productId", post(wishlist::add_to_wishlist))
        .route("/api/wishlist/remove/:productId", delete(wishlist::remove_from_wishlist))
        .route("/api/wishlist/clear", delete(wishlist::clear_wishlist))
        .route("/api/users/wishlist", get(wishlist::get_wishlist).post(wishlist::add_to_wishlist_body))
        .route("/api/users/wishlist/:productId", delete(wishlist::remove_from_wishlist))
        // Orders and reviews
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route("/api/orders/:id", get(orders::get_order))
        .route("/api/products/:id/ratings", post(products::submit_review))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(products::create_product))
        .route("/api/products/:id", put(products::update_product).delete(products::delete_product))
        .route("/api/products/:id/reviews/pending", get(products::pending_reviews))
        .route("/api/products/:id/reviews/:reviewId/approve", patch(products::approve_review))
        .route("/api/orders/:id", put(orders::update_order_status).delete(orders::delete_order))
        .route("/api/orders/:id/status", put(orders::update_order_status))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/users/:id/reset-password", put(users::reset_password))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/customer-say/all", get(testimonials::all_testimonials))
        .route("/api/customer-say/:id", delete(testimonials::delete_testimonial))
        .route("/api/customer-say/:id/approval", put(testimonials::set_approval))
        .route("/api/contact", get(contact::list_contacts))
        .route("/api/contact/:id/status", patch(contact::update_contact_status))
}

async fn root() -> &'static str {
    "Storefront API is running"
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::internal(format!("handler panicked: {detail}")).into_response()
}

/// Any origin in development; only `FRONTEND_URL` origins in production.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins = if config.production {
        AllowOrigin::list(
            config
                .frontend_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
