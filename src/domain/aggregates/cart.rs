//! Cart Aggregate

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;
use crate::error::AppError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedOptions {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
}

/// A user's cart. Every mutation that raises a quantity is checked against
/// the product's current stock.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Add `quantity` of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32, options: Option<SelectedOptions>) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let existing = self.items.iter().position(|i| i.product_id == product.id);
        let current = existing.map_or(0, |idx| self.items[idx].quantity);
        let wanted = current.saturating_add(quantity);
        check_stock(product, wanted)?;

        match existing {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = wanted;
                if options.is_some() {
                    item.selected_options = options;
                }
            }
            None => self.items.push(CartItem { product_id: product.id, quantity, selected_options: options }),
        }
        Ok(())
    }

    /// Set an absolute quantity on an existing line.
    pub fn set_quantity(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        check_stock(product, quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id)
            .ok_or(CartError::ItemNotFound)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removing a product that is not in the cart leaves it unchanged.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) { self.items.clear(); }
}

fn check_stock(product: &Product, quantity: u32) -> Result<(), CartError> {
    if i64::from(quantity) > i64::from(product.stock) {
        return Err(CartError::InsufficientStock { available: product.stock.max(0) });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError { InvalidQuantity, InsufficientStock { available: i32 }, ItemNotFound }

impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuantity => write!(f, "Quantity must be at least 1"),
            Self::InsufficientStock { available } => write!(f, "Insufficient stock. Only {available} available"),
            Self::ItemNotFound => write!(f, "Item not found in cart"),
        }
    }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::ItemNotFound => AppError::not_found("Cart item"),
            other => AppError::validation(other.to_string()),
        }
    }
}
