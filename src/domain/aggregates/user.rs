//! User Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::cart::Cart;
use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::domain::password::Password;
use crate::domain::value_objects::normalize_email;
use crate::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role { #[default] User, Admin }

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self { Self::User => ROLE_USER, Self::Admin => ROLE_ADMIN }
    }
    /// Unknown stored roles get the least privilege.
    pub fn parse(value: &str) -> Self {
        if value == ROLE_ADMIN { Self::Admin } else { Self::User }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub full_name: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: Password,
    pub role: Role,
    pub cart: Cart,
    pub wishlist: Vec<Uuid>,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn register(name: &str, email: &str, password: Password) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: normalize_email(email),
            password,
            role: Role::User,
            cart: Cart::new(),
            wishlist: Vec::new(),
            addresses: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool { self.role == Role::Admin }

    pub fn add_address(&mut self, input: AddressInput) {
        if input.is_default {
            self.addresses.iter_mut().for_each(|a| a.is_default = false);
        }
        self.addresses.push(Address {
            id: Uuid::new_v4(),
            full_name: input.full_name,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            country: input.country,
            phone: input.phone,
            is_default: input.is_default,
        });
        self.touch();
    }

    pub fn remove_address(&mut self, address_id: Uuid) {
        self.addresses.retain(|a| a.id != address_id);
        self.touch();
    }

    /// Adding a product that is already wishlisted is an error.
    pub fn add_to_wishlist(&mut self, product_id: Uuid) -> AppResult<()> {
        if self.wishlist.contains(&product_id) {
            return Err(AppError::validation("Product already in wishlist"));
        }
        self.wishlist.push(product_id);
        self.touch();
        Ok(())
    }

    pub fn remove_from_wishlist(&mut self, product_id: Uuid) {
        self.wishlist.retain(|id| *id != product_id);
        self.touch();
    }

    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();
        self.touch();
    }

    /// Append ids not already present, keeping order. Returns how many were added.
    pub fn merge_wishlist(&mut self, product_ids: impl IntoIterator<Item = Uuid>) -> usize {
        let before = self.wishlist.len();
        for id in product_ids {
            if !self.wishlist.contains(&id) {
                self.wishlist.push(id);
            }
        }
        self.touch();
        self.wishlist.len() - before
    }

    pub(crate) fn touch(&mut self) { self.updated_at = Utc::now(); }
}

/// Compact reference used when an order shows who placed it.
#[derive(Clone, Debug, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserRef {
    fn from(u: &User) -> Self {
        Self { id: u.id, name: u.name.clone(), email: u.email.clone() }
    }
}
