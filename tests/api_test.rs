//! HTTP tests against the real router over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::domain::{Password, Role, User};
use storefront::{create_router, AppState, Config, Store};

const SECRET: &str = "integration-test-secret-key-32-chars!";

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(Store::in_memory(), Config::local(SECRET));
        Self { router: create_router(state.clone()), state }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Admins cannot self-register; put one straight into the store.
    async fn admin_token(&self) -> String {
        let mut admin = User::register("Admin", "admin@shop.test", Password::new("Adm1n!pass").unwrap()).unwrap();
        admin.role = Role::Admin;
        self.state.store.users.save(&admin).await.unwrap();
        self.state.tokens.issue(&admin).unwrap()
    }

    async fn user_token(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .post("/api/auth/register", None, json!({"name": name, "email": email, "password": "Sh0pper!x"}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, admin: &str, sku: &str, category: &str, price: f64, stock: i32) -> Value {
        let (status, body) = self.post("/api/products", Some(admin), product_body(sku, category, price, stock)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

fn product_body(sku: &str, category: &str, price: f64, stock: i32) -> Value {
    json!({
        "name": format!("Product {sku}"),
        "nameAr": "منتج",
        "slug": format!("product-{}", sku.to_lowercase()),
        "shortDescription": "Short",
        "shortDescriptionAr": "قصير",
        "description": "Long description",
        "descriptionAr": "وصف",
        "basePrice": price,
        "mainImage": "/img/p.png",
        "stock": stock,
        "sku": sku,
        "category": category,
        "categoryAr": "فئة",
        "brand": "Acme",
        "brandAr": "أكمي",
        "sizes": ["40", "41"],
        "colors": [{"name": "Black", "hex": "#000000"}]
    })
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_root_and_unknown_route() {
    let app = TestApp::new();

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("running"));

    let (status, body) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn test_listing_filters_sorts_and_paginates() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    for (i, price) in [50.0, 10.0, 40.0, 20.0, 30.0].into_iter().enumerate() {
        app.create_product(&admin, &format!("SH-{i}"), "Shoes", price, 5).await;
    }
    app.create_product(&admin, "BG-1", "Bags", 5.0, 5).await;

    let (status, body) = app.get("/api/products?category=Shoes&sort=price_asc&page=1&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let prices: Vec<f64> = body["data"].as_array().unwrap().iter().map(|p| p["finalPrice"].as_f64().unwrap()).collect();
    assert_eq!(prices, vec![10.0, 20.0]);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalProducts"], 5);
    assert_eq!(body["hasNextPage"], true);
    assert_eq!(body["hasPrevPage"], false);

    let (_, last) = app.get("/api/products?category=shoes&sort=price_asc&page=3&limit=2", None).await;
    assert_eq!(last["data"].as_array().unwrap().len(), 1);
    assert_eq!(last["hasNextPage"], false);

    // Metacharacters are matched literally
    let (_, none) = app.get("/api/products?search=.*", None).await;
    assert_eq!(none["data"], json!([]));
    assert_eq!(none["totalPages"], 0);
}

#[tokio::test]
async fn test_product_detail_by_id_or_slug_and_filter_options() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "SH-1", "Shoes", 99.0, 3).await;

    let (status, by_id) = app.get(&format!("/api/products/{}", id_of(&product)), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, by_slug) = app.get("/api/products/PRODUCT-SH-1", None).await;
    assert_eq!(by_id["data"]["id"], by_slug["data"]["id"]);

    let (status, _) = app.get("/api/products/missing-slug", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, options) = app.get("/api/products/filter-options", None).await;
    assert_eq!(options["data"]["categories"], json!(["Shoes"]));
    assert_eq!(options["data"]["colors"], json!(["Black"]));
    assert_eq!(options["data"]["priceRange"], json!({"minPrice": 99.0, "maxPrice": 99.0}));
    assert_eq!(options["data"]["availability"], json!(["in_stock", "out_of_stock", "pre_order"]));
}

#[tokio::test]
async fn test_quick_search() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.create_product(&admin, "SH-1", "Shoes", 10.0, 1).await;

    let (_, short) = app.get("/api/products/search?q=s", None).await;
    assert_eq!(short["data"], json!([]));

    let (_, hits) = app.get("/api/products/search?q=shoe", None).await;
    assert_eq!(hits["data"].as_array().unwrap().len(), 1);
    assert_eq!(hits["data"][0]["slug"], "product-sh-1");
}

#[tokio::test]
async fn test_register_login_and_guards() {
    let app = TestApp::new();
    let token = app.user_token("Ana", "Ana@Example.com").await;

    let (status, _) = app
        .post("/api/auth/register", None, json!({"name": "Ana", "email": "ana@example.com", "password": "Sh0pper!x"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post("/api/auth/register", None, json!({"name": "Bo", "email": "bo@example.com", "password": "weak"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app.post("/api/auth/login", None, json!({"email": "ana@example.com", "password": "wrong"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app
        .post("/api/auth/login", None, json!({"email": " ANA@example.com", "password": "Sh0pper!x"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user"].get("password").is_none());

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "ana@example.com");

    let (status, body) = app.post("/api/products", Some(&token), product_body("X-1", "Shoes", 1.0, 1)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_merges_and_checks_stock() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("Ana", "ana@example.com").await;
    let product = id_of(&app.create_product(&admin, "SH-1", "Shoes", 10.0, 4).await);

    let (status, _) = app.post("/api/cart", Some(&user), json!({"productId": product, "quantity": 2})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/cart", Some(&user), json!({"productId": product, "quantity": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, cart) = app
        .post(
            "/api/users/cart",
            Some(&user),
            json!({"productId": product, "quantity": 2, "selectedOptions": {"size": "41"}}),
        )
        .await;
    assert_eq!(cart["data"][0]["quantity"], 4);
    assert_eq!(cart["data"][0]["selectedOptions"]["size"], "41");
    assert_eq!(cart["data"][0]["product"]["finalPrice"], 10.0);

    let (status, _) = app.put(&format!("/api/cart/{product}"), Some(&user), json!({"quantity": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cart) = app.send(Method::DELETE, &format!("/api/cart/{}", uuid::Uuid::new_v4()), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["data"].as_array().unwrap().len(), 1);

    let (_, cart) = app.send(Method::DELETE, "/api/cart", Some(&user), None).await;
    assert_eq!(cart["data"], json!([]));
}

#[tokio::test]
async fn test_reviews_count_only_once_approved() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("Ana", "ana@example.com").await;
    let product = id_of(&app.create_product(&admin, "SH-1", "Shoes", 10.0, 4).await);
    let ratings = format!("/api/products/{product}/ratings");

    let (status, body) = app.post(&ratings, Some(&user), json!({"rating": 2, "comment": "meh"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review submitted and pending approval");
    let (_, body) = app.post(&ratings, Some(&user), json!({"rating": 4, "comment": "better"})).await;
    assert_eq!(body["message"], "Review updated and pending approval");
    let (status, _) = app.post(&ratings, Some(&user), json!({"rating": 7})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, public) = app.get(&format!("/api/products/{product}/reviews"), None).await;
    assert_eq!(public["data"], json!([]));

    let (_, detail) = app.get(&format!("/api/products/{product}"), None).await;
    assert_eq!(detail["data"]["reviews"], json!([]));
    let (_, listed) = app.get("/api/products", None).await;
    assert_eq!(listed["data"][0]["reviews"], json!([]));

    let pending = format!("/api/products/{product}/reviews/pending");
    let (status, _) = app.get(&pending, Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, queue) = app.get(&pending, Some(&admin)).await;
    assert_eq!(queue["data"][0]["comment"], "better");
    let review_id = queue["data"][0]["id"].as_str().unwrap().to_string();
    let approve = format!("/api/products/{product}/reviews/{review_id}/approve");
    let (status, approved) = app.send(Method::PATCH, &approve, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["data"]["averageRating"], 4.0);
    assert_eq!(approved["data"]["totalReviews"], 1);

    let (_, public) = app.get(&format!("/api/products/{product}/reviews"), None).await;
    assert_eq!(public["data"][0]["userName"], "Ana");
    let (_, detail) = app.get(&format!("/api/products/{product}"), None).await;
    assert_eq!(detail["data"]["reviews"][0]["id"], review_id.as_str());
    let (_, queue) = app.get(&pending, Some(&admin)).await;
    assert_eq!(queue["data"], json!([]));

    let missing = format!("/api/products/{product}/reviews/{}/approve", uuid::Uuid::new_v4());
    let (status, _) = app.send(Method::PATCH, &missing, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_of_deleted_user_is_anonymous() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("Ana", "ana@example.com").await;
    let product = id_of(&app.create_product(&admin, "SH-1", "Shoes", 10.0, 4).await);
    let (_, me) = app.get("/api/auth/me", Some(&user)).await;
    let user_id = id_of(&me["data"]);

    app.post(&format!("/api/products/{product}/ratings"), Some(&user), json!({"rating": 5, "comment": "great"}))
        .await;
    let (_, queue) = app.get(&format!("/api/products/{product}/reviews/pending"), Some(&admin)).await;
    let review_id = queue["data"][0]["id"].as_str().unwrap().to_string();
    let approve = format!("/api/products/{product}/reviews/{review_id}/approve");
    app.send(Method::PATCH, &approve, Some(&admin), None).await;

    let (status, _) = app.send(Method::DELETE, &format!("/api/users/{user_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, reviews) = app.get(&format!("/api/products/{product}/reviews"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews["data"][0]["userName"], "Anonymous");
    assert_eq!(reviews["data"][0]["userId"], user_id.as_str());
    assert_eq!(reviews["data"][0]["comment"], "great");
}

#[tokio::test]
async fn test_wishlist() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("Ana", "ana@example.com").await;
    let product = id_of(&app.create_product(&admin, "SH-1", "Shoes", 10.0, 4).await);

    let (status, _) = app.post(&format!("/api/wishlist/add/{product}"), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post(&format!("/api/wishlist/add/{product}"), Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .post(&format!("/api/wishlist/add/{}", uuid::Uuid::new_v4()), Some(&user), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, synced) = app
        .post("/api/wishlist/sync", Some(&user), json!({"productIds": [product, "garbage", 7]}))
        .await;
    assert_eq!(synced["data"].as_array().unwrap().len(), 1);

    let (_, cleared) = app.send(Method::DELETE, "/api/wishlist/clear", Some(&user), None).await;
    assert_eq!(cleared["data"], json!([]));
}

#[tokio::test]
async fn test_orders_lifecycle() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let ana = app.user_token("Ana", "ana@example.com").await;
    let bo = app.user_token("Bo", "bo@example.com").await;
    let product = id_of(&app.create_product(&admin, "SH-1", "Shoes", 10.0, 4).await);
    app.post("/api/cart", Some(&ana), json!({"productId": product, "quantity": 1})).await;

    let (status, body) = app.post("/api/orders", Some(&ana), json!({"products": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Products are required");

    let order = json!({
        "products": [{"productId": product, "name": "Product SH-1", "price": 10.0, "quantity": 1}],
        "shippingAddress": {"fullName": "Ana", "address": "1 Nile St"},
        "paymentMethod": "cash",
        "totalPrice": 10.0
    });
    let (status, created) = app.post("/api/orders", Some(&ana), order).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "pending");
    let order_id = id_of(&created["data"]);

    let (_, cart) = app.get("/api/cart", Some(&ana)).await;
    assert_eq!(cart["data"], json!([]));

    let (status, _) = app.get(&format!("/api/orders/{order_id}"), Some(&bo)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, own) = app.get(&format!("/api/orders/{order_id}"), Some(&ana)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["data"]["user"]["name"], "Ana");

    let (_, listed) = app.get("/api/orders", Some(&bo)).await;
    assert_eq!(listed["data"], json!([]));
    let (_, listed) = app.get("/api/orders", Some(&admin)).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["totalPages"], 1);

    let (status, _) = app
        .put(&format!("/api/orders/{order_id}/status"), Some(&admin), json!({"status": "lost"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, updated) = app
        .put(&format!("/api/orders/{order_id}/status"), Some(&admin), json!({"status": "delivered"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "delivered");

    let (_, stats) = app.get("/api/dashboard/stats", Some(&admin)).await;
    assert_eq!(stats["data"]["orders"], 1);
    assert_eq!(stats["data"]["completedOrders"], 1);
    assert_eq!(stats["data"]["revenue"], 10.0);
    assert_eq!(stats["data"]["users"], 3);
    assert_eq!(stats["data"]["lowStock"], 1);
    assert_eq!(stats["data"]["recentOrders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_testimonials_upsert_by_email() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let (status, _) = app
        .post("/api/customer-say", None, json!({"name": "Mona", "email": "Mona@Mail.com", "rating": 5, "comment": "great"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app
        .post("/api/customer-say", None, json!({"name": "Mona", "email": " mona@mail.COM ", "rating": 3, "comment": "ok"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["rating"], 3.0);
    assert_eq!(second["data"]["isApproved"], false);

    let (_, approved) = app.get("/api/customer-say/approved", None).await;
    assert_eq!(approved["count"], 0);
    let (status, _) = app.get("/api/customer-say/all", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, all) = app.get("/api/customer-say/all", Some(&admin)).await;
    assert_eq!(all["count"], 1);

    let id = id_of(&all["data"][0]);
    app.put(&format!("/api/customer-say/{id}/approval"), Some(&admin), json!({"isApproved": true})).await;
    let (_, approved) = app.get("/api/customer-say/approved", None).await;
    assert_eq!(approved["count"], 1);
}

#[tokio::test]
async fn test_contact_messages() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let (status, _) = app.post("/api/contact", None, json!({"name": "Sam", "email": "sam@x.io", "message": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, created) = app
        .post("/api/contact", None, json!({"name": "Sam", "email": "sam@x.io", "message": "Hello"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "new");

    let id = id_of(&created["data"]);
    let uri = format!("/api/contact/{id}/status");
    let (status, _) = app.send(Method::PATCH, &uri, Some(&admin), Some(json!({"status": "archived"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, updated) = app.send(Method::PATCH, &uri, Some(&admin), Some(json!({"status": "read"}))).await;
    assert_eq!(updated["data"]["status"], "read");

    let (_, listed) = app.get("/api/contact", Some(&admin)).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}
