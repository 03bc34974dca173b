//! In-process store used by tests and `serve --in-memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, OrderStats, OrderStore, ProductStore, TestimonialStore, UserStore};
use crate::catalog::{FilterValues, Page, PageRequest, ProductFilter, ProductQuery, SortMode};
use crate::domain::{Contact, Order, OrderStatus, Product, Testimonial, User};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<Uuid, Product>>,
    users: RwLock<HashMap<Uuid, User>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    testimonials: RwLock<HashMap<Uuid, Testimonial>>,
    contacts: RwLock<HashMap<Uuid, Contact>>,
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn newest_orders_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn save(&self, product: &Product) -> AppResult<()> {
        let mut products = self.products.write().await;
        for other in products.values().filter(|p| p.id != product.id) {
            if other.slug == product.slug {
                return Err(AppError::conflict("Slug"));
            }
            if other.sku == product.sku {
                return Err(AppError::conflict("SKU"));
            }
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: &ProductQuery) -> AppResult<Page<Product>> {
        let mut matches: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| query.filter.matches(p))
            .cloned()
            .collect();
        matches.sort_by(|a, b| query.sort.compare(a, b));
        let total = len_u64(matches.len());
        Ok(Page { items: query.page.slice(matches), total })
    }

    async fn search(&self, filter: &ProductFilter, limit: u64) -> AppResult<Vec<Product>> {
        let mut matches: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matches.sort_by(|a, b| SortMode::Newest.compare(a, b));
        matches.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matches)
    }

    async fn filter_values(&self) -> AppResult<FilterValues> {
        let products = self.products.read().await;
        let mut values = FilterValues::default();
        for p in products.values() {
            values.categories.push(p.category.clone());
            values.brands.push(p.brand.clone());
            values.sizes.extend(p.sizes.iter().cloned());
            values.colors.extend(p.colors.iter().map(|c| c.name.clone()));
            values.materials.extend(p.material.clone());
            values.shops.extend(p.shop.clone());
            values.product_types.extend(p.product_type.clone());
            values.secondtypes.extend(p.secondtype.clone());
            values.secondtypes_ar.extend(p.secondtype_ar.clone());
            values.thirdtypes.extend(p.thirdtype.clone());
            values.thirdtypes_ar.extend(p.thirdtype_ar.clone());
            values.price_range = Some(match values.price_range {
                None => (p.final_price, p.final_price),
                Some((lo, hi)) => (lo.min(p.final_price), hi.max(p.final_price)),
            });
        }
        Ok(values)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(len_u64(self.products.read().await.len()))
    }

    async fn count_low_stock(&self, threshold: i32) -> AppResult<u64> {
        Ok(len_u64(self.products.read().await.values().filter(|p| p.stock < threshold).count()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn save(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(AppError::conflict("Email"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(len_u64(self.users.read().await.len()))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn save(&self, order: &Order) -> AppResult<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }

    async fn list(&self, user_id: Option<Uuid>, page: PageRequest) -> AppResult<Page<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| user_id.map_or(true, |uid| o.user_id == uid))
            .cloned()
            .collect();
        newest_orders_first(&mut orders);
        let total = len_u64(orders.len());
        Ok(Page { items: page.slice(orders), total })
    }

    async fn all_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        newest_orders_first(&mut orders);
        Ok(orders)
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        newest_orders_first(&mut orders);
        orders.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(orders)
    }

    async fn stats(&self) -> AppResult<OrderStats> {
        let orders = self.orders.read().await;
        Ok(orders.values().fold(OrderStats::default(), |mut s, o| {
            s.count += 1;
            s.revenue += o.total_price;
            match o.status {
                OrderStatus::Pending => s.pending += 1,
                OrderStatus::Delivered => s.delivered += 1,
                _ => {}
            }
            s
        }))
    }
}

#[async_trait]
impl TestimonialStore for MemoryStore {
    async fn save(&self, testimonial: &Testimonial) -> AppResult<()> {
        let mut testimonials = self.testimonials.write().await;
        if testimonials.values().any(|t| t.id != testimonial.id && t.email == testimonial.email) {
            return Err(AppError::conflict("Email"));
        }
        testimonials.insert(testimonial.id, testimonial.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Testimonial>> {
        Ok(self.testimonials.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Testimonial>> {
        Ok(self.testimonials.read().await.values().find(|t| t.email == email).cloned())
    }

    async fn list(&self, approved_only: bool) -> AppResult<Vec<Testimonial>> {
        let mut list: Vec<Testimonial> = self
            .testimonials
            .read()
            .await
            .values()
            .filter(|t| !approved_only || t.is_approved)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.testimonials.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn save(&self, contact: &Contact) -> AppResult<()> {
        self.contacts.write().await.insert(contact.id, contact.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Contact>> {
        Ok(self.contacts.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Contact>> {
        let mut list: Vec<Contact> = self.contacts.read().await.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(len_u64(self.contacts.read().await.len()))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::ProductListParams;
    use crate::domain::aggregates::product::tests::new_product;
    use crate::domain::aggregates::user::tests::user;
    use crate::domain::{NewOrder, Order, OrderStatus, Product};
    use crate::error::AppError;
    use crate::store::Store;

    fn shoe(name: &str, sku: &str, price: f64) -> Product {
        let mut new = new_product(name, sku);
        new.base_price = price;
        Product::create(new).unwrap()
    }

    #[tokio::test]
    async fn test_product_uniqueness() {
        let store = Store::in_memory();
        store.products.save(&shoe("Runner", "R-1", 10.0)).await.unwrap();
        let dup_slug = shoe("Runner", "R-2", 10.0);
        assert!(matches!(store.products.save(&dup_slug).await, Err(AppError::Conflict(ref w)) if w == "Slug"));
        let dup_sku = shoe("Walker", "R-1", 10.0);
        assert!(matches!(store.products.save(&dup_sku).await, Err(AppError::Conflict(ref w)) if w == "SKU"));
    }

    #[tokio::test]
    async fn test_pages_are_disjoint_and_complete() {
        let store = Store::in_memory();
        for i in 0..7 {
            store.products.save(&shoe(&format!("Shoe {i}"), &format!("S-{i}"), 50.0)).await.unwrap();
        }
        let mut seen = Vec::new();
        for page in 1..=3 {
            let params = ProductListParams {
                sort: Some("price_asc".into()),
                page: Some(page.to_string()),
                limit: Some("3".into()),
                ..Default::default()
            };
            let result = store.products.list(&params.into_query()).await.unwrap();
            assert_eq!(result.total, 7);
            seen.extend(result.items.into_iter().map(|p| p.id));
        }
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(seen.len(), 7);
        assert_eq!(unique.len(), 7);
    }

    #[tokio::test]
    async fn test_filter_values_and_low_stock() {
        let store = Store::in_memory();
        let mut cheap = shoe("Cheap", "C-1", 20.0);
        cheap.stock = 2;
        store.products.save(&cheap).await.unwrap();
        store.products.save(&shoe("Dear", "D-1", 300.0)).await.unwrap();

        let values = store.products.filter_values().await.unwrap();
        assert_eq!(values.price_range, Some((20.0, 300.0)));
        assert_eq!(store.products.count_low_stock(10).await.unwrap(), 2);
        assert_eq!(store.products.count_low_stock(5).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_user_email_unique() {
        let store = Store::in_memory();
        store.users.save(&user("Ana", "ana@example.com")).await.unwrap();
        let again = user("Other", "ANA@example.com");
        assert!(matches!(store.users.save(&again).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_order_stats_and_scoping() {
        let store = Store::in_memory();
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        for (owner, total) in [(a, 100.0), (a, 50.0), (b, 30.0)] {
            let new: NewOrder = serde_json::from_value(serde_json::json!({
                "products": [{ "productId": uuid::Uuid::new_v4(), "name": "X", "price": total, "quantity": 1 }],
                "shippingAddress": { "fullName": "A", "address": "B" },
                "paymentMethod": "card",
                "totalPrice": total
            }))
            .unwrap();
            let mut order = Order::place(owner, new).unwrap();
            if total == 50.0 {
                order.set_status(OrderStatus::Delivered);
            }
            store.orders.save(&order).await.unwrap();
        }

        let stats = store.orders.stats().await.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.revenue, 180.0);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.delivered, 1);

        let page = crate::catalog::PageRequest { page: 1, limit: 10 };
        assert_eq!(store.orders.list(Some(a), page).await.unwrap().total, 2);
        assert_eq!(store.orders.list(None, page).await.unwrap().total, 3);
        assert_eq!(store.orders.recent(2).await.unwrap().len(), 2);
    }
}
