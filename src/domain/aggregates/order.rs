//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::SelectedOptions;
use crate::error::AppError;

/// Snapshot of a purchased product. Self-contained so deleted products do
/// not break order history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Confirmed, Shipped, Delivered, Cancelled }

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [Self::Pending, Self::Confirmed, Self::Shipped, Self::Delivered, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, OrderError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or(OrderError::InvalidStatus)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub products: Vec<OrderLine>,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub notes: String,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checkout payload as sent by the client. Everything is optional here so
/// that missing fields produce the domain messages rather than serde errors.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewOrder {
    pub products: Vec<OrderLine>,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub total_price: Option<f64>,
}

impl Order {
    pub fn place(user_id: Uuid, new: NewOrder) -> Result<Self, OrderError> {
        if new.products.is_empty() {
            return Err(OrderError::NoItems);
        }
        if new.products.iter().any(|line| line.quantity < 1) {
            return Err(OrderError::InvalidQuantity);
        }
        let shipping_address = new
            .shipping_address
            .filter(|a| !a.full_name.trim().is_empty() && !a.address.trim().is_empty())
            .ok_or(OrderError::MissingShippingAddress)?;
        let payment_method = new
            .payment_method
            .filter(|m| !m.trim().is_empty())
            .ok_or(OrderError::MissingPaymentMethod)?;
        let total_price = new
            .total_price
            .filter(|t| t.is_finite() && *t > 0.0)
            .ok_or(OrderError::InvalidTotal)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            user_id,
            products: new.products,
            status: OrderStatus::Pending,
            shipping_address,
            payment_method,
            notes: new.notes.unwrap_or_default(),
            total_price,
            created_at: now,
            updated_at: now,
        })
    }

    /// Transitions are unconstrained; any status may follow any other.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool { self.user_id == user_id }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    NoItems,
    InvalidQuantity,
    MissingShippingAddress,
    MissingPaymentMethod,
    InvalidTotal,
    InvalidStatus,
}

impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoItems => write!(f, "Products are required"),
            Self::InvalidQuantity => write!(f, "Each product quantity must be at least 1"),
            Self::MissingShippingAddress => write!(f, "Shipping address is required"),
            Self::MissingPaymentMethod => write!(f, "Payment method is required"),
            Self::InvalidTotal => write!(f, "Valid total price is required"),
            Self::InvalidStatus => write!(f, "Invalid order status"),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self { AppError::validation(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn checkout() -> NewOrder {
        serde_json::from_value(json!({
            "products": [{
                "productId": Uuid::new_v4(),
                "name": "Widget",
                "price": 25.0,
                "quantity": 2,
                "selectedOptions": { "size": "M" }
            }],
            "shippingAddress": { "fullName": "Ana Lima", "address": "1 Main St", "city": "Cairo" },
            "paymentMethod": "cash_on_delivery",
            "totalPrice": 50.0
        }))
        .unwrap()
    }

    #[test]
    fn test_order_workflow() {
        let user = Uuid::new_v4();
        let mut order = Order::place(user, checkout()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.is_owned_by(user));
        assert_eq!(order.notes, "");
        order.set_status(OrderStatus::Delivered);
        order.set_status(OrderStatus::Pending);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_validation_errors() {
        let mut new = checkout();
        new.products.clear();
        assert_eq!(Order::place(Uuid::new_v4(), new).unwrap_err(), OrderError::NoItems);

        let mut new = checkout();
        new.products[0].quantity = 0;
        assert_eq!(Order::place(Uuid::new_v4(), new).unwrap_err(), OrderError::InvalidQuantity);

        let mut new = checkout();
        new.shipping_address.as_mut().unwrap().address = " ".into();
        assert_eq!(Order::place(Uuid::new_v4(), new).unwrap_err(), OrderError::MissingShippingAddress);

        let mut new = checkout();
        new.payment_method = None;
        assert_eq!(Order::place(Uuid::new_v4(), new).unwrap_err(), OrderError::MissingPaymentMethod);

        let mut new = checkout();
        new.total_price = Some(0.0);
        assert_eq!(Order::place(Uuid::new_v4(), new).unwrap_err(), OrderError::InvalidTotal);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("shipped"), Ok(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("refunded"), Err(OrderError::InvalidStatus));
    }
}
