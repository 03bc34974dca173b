//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::review::Review;
use crate::config::DEFAULT_CURRENCY;
use crate::domain::value_objects::{Sku, Slug};
use crate::error::{AppError, AppResult};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub name_ar: String,
    pub slug: String,
    pub short_description: String,
    pub short_description_ar: String,
    pub description: String,
    pub description_ar: String,
    pub base_price: f64,
    pub discount: Discount,
    pub final_price: f64,
    pub currency: String,
    pub main_image: String,
    pub image_gallery: Vec<String>,
    pub video: Option<String>,
    pub stock: i32,
    pub sku: String,
    pub availability: Availability,
    pub category: String,
    pub category_ar: String,
    pub sub_category: Option<String>,
    pub sub_category_ar: Option<String>,
    pub brand: String,
    pub brand_ar: String,
    pub product_type: Option<String>,
    pub secondtype: Option<String>,
    pub secondtype_ar: Option<String>,
    pub thirdtype: Option<String>,
    pub thirdtype_ar: Option<String>,
    pub tags: Vec<String>,
    pub tags_ar: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<Color>,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub material: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub warranty: Option<String>,
    pub return_policy: Option<String>,
    pub specifications: Value,
    pub specifications_ar: Value,
    pub variants: Vec<Value>,
    pub reviews: Vec<Review>,
    pub shop: Option<String>,
    pub is_exclusive: bool,
    pub toplay: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,
    #[serde(default)]
    pub value: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind { #[default] Percentage, Fixed }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability { #[default] InStock, OutOfStock, PreOrder }

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color { pub name: String, #[serde(default)] pub hex: Option<String> }

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions { pub length: Option<String>, pub width: Option<String>, pub height: Option<String> }

impl Availability {
    pub const ALL: [Availability; 3] = [Self::InStock, Self::OutOfStock, Self::PreOrder];

    pub fn as_str(&self) -> &'static str {
        match self { Self::InStock => "in_stock", Self::OutOfStock => "out_of_stock", Self::PreOrder => "pre_order" }
    }
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

impl Discount {
    /// Price after discount, never below zero, rounded to cents.
    pub fn apply(&self, base_price: f64) -> f64 {
        let price = match self.kind {
            DiscountKind::Percentage => base_price * (1.0 - self.value / 100.0),
            DiscountKind::Fixed => base_price - self.value,
        };
        round_cents(price.max(0.0))
    }

    fn validate(&self) -> AppResult<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(AppError::validation("Discount must not be negative"));
        }
        if self.kind == DiscountKind::Percentage && self.value > 100.0 {
            return Err(AppError::validation("Percentage discount cannot exceed 100"));
        }
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

fn default_currency() -> String { DEFAULT_CURRENCY.to_string() }
fn empty_object() -> Value { Value::Object(Default::default()) }

/// Create payload, also the record shape accepted by the seed command.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Arabic name is required"))]
    pub name_ar: String,
    pub slug: String,
    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_description: String,
    #[validate(length(min = 1, message = "Arabic short description is required"))]
    pub short_description_ar: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Arabic description is required"))]
    pub description_ar: String,
    #[validate(range(min = 0.0, message = "Base price must not be negative"))]
    pub base_price: f64,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[validate(length(min = 1, message = "Main image is required"))]
    pub main_image: String,
    #[serde(default)]
    pub image_gallery: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    pub sku: String,
    #[serde(default)]
    pub availability: Availability,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Arabic category is required"))]
    pub category_ar: String,
    pub sub_category: Option<String>,
    pub sub_category_ar: Option<String>,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Arabic brand is required"))]
    pub brand_ar: String,
    pub product_type: Option<String>,
    pub secondtype: Option<String>,
    pub secondtype_ar: Option<String>,
    pub thirdtype: Option<String>,
    pub thirdtype_ar: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tags_ar: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    pub material: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub warranty: Option<String>,
    pub return_policy: Option<String>,
    #[serde(default = "empty_object")]
    pub specifications: Value,
    #[serde(default = "empty_object")]
    pub specifications_ar: Value,
    #[serde(default)]
    pub variants: Vec<Value>,
    pub shop: Option<String>,
    #[serde(default)]
    pub is_exclusive: bool,
    #[serde(default)]
    pub toplay: bool,
}

impl Product {
    pub fn create(new: NewProduct) -> AppResult<Self> {
        new.discount.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            name: new.name.trim().to_string(),
            name_ar: new.name_ar,
            slug: Slug::new(&new.slug)?.into_string(),
            short_description: new.short_description,
            short_description_ar: new.short_description_ar,
            description: new.description,
            description_ar: new.description_ar,
            final_price: new.discount.apply(new.base_price),
            base_price: new.base_price,
            discount: new.discount,
            currency: new.currency,
            main_image: new.main_image,
            image_gallery: new.image_gallery,
            video: new.video,
            stock: new.stock,
            sku: Sku::new(new.sku)?.into_string(),
            availability: new.availability,
            category: new.category,
            category_ar: new.category_ar,
            sub_category: new.sub_category,
            sub_category_ar: new.sub_category_ar,
            brand: new.brand,
            brand_ar: new.brand_ar,
            product_type: new.product_type,
            secondtype: new.secondtype,
            secondtype_ar: new.secondtype_ar,
            thirdtype: new.thirdtype,
            thirdtype_ar: new.thirdtype_ar,
            tags: new.tags,
            tags_ar: new.tags_ar,
            sizes: new.sizes,
            colors: new.colors,
            average_rating: 0.0,
            total_reviews: 0,
            material: new.material,
            weight: new.weight,
            dimensions: new.dimensions,
            warranty: new.warranty,
            return_policy: new.return_policy,
            specifications: new.specifications,
            specifications_ar: new.specifications_ar,
            variants: new.variants,
            reviews: Vec::new(),
            shop: new.shop,
            is_exclusive: new.is_exclusive,
            toplay: new.toplay,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_in_stock(&self) -> bool { self.stock > 0 }

    pub(crate) fn touch(&mut self) { self.updated_at = Utc::now(); }
}

/// Partial update. Review data and rating aggregates are not editable here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub short_description_ar: Option<String>,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub base_price: Option<f64>,
    pub discount: Option<Discount>,
    pub currency: Option<String>,
    pub main_image: Option<String>,
    pub image_gallery: Option<Vec<String>>,
    pub video: Option<String>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub availability: Option<Availability>,
    pub category: Option<String>,
    pub category_ar: Option<String>,
    pub sub_category: Option<String>,
    pub sub_category_ar: Option<String>,
    pub brand: Option<String>,
    pub brand_ar: Option<String>,
    pub product_type: Option<String>,
    pub secondtype: Option<String>,
    pub secondtype_ar: Option<String>,
    pub thirdtype: Option<String>,
    pub thirdtype_ar: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tags_ar: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<Color>>,
    pub material: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub warranty: Option<String>,
    pub return_policy: Option<String>,
    pub specifications: Option<Value>,
    pub specifications_ar: Option<Value>,
    pub variants: Option<Vec<Value>>,
    pub shop: Option<String>,
    pub is_exclusive: Option<bool>,
    pub toplay: Option<bool>,
}

impl ProductPatch {
    /// Apply the patch and re-derive the final price.
    pub fn apply(self, product: &mut Product) -> AppResult<()> {
        let patch = self;
        macro_rules! assign {
            ($($field:ident),* $(,)?) => { $( if let Some(v) = patch.$field { product.$field = v; } )* };
        }
        macro_rules! assign_some {
            ($($field:ident),* $(,)?) => { $( if let Some(v) = patch.$field { product.$field = Some(v); } )* };
        }

        if let Some(base_price) = patch.base_price {
            if !base_price.is_finite() || base_price < 0.0 {
                return Err(AppError::validation("Base price must not be negative"));
            }
        }
        if let Some(stock) = patch.stock {
            if stock < 0 {
                return Err(AppError::validation("Stock must not be negative"));
            }
        }
        if let Some(discount) = &patch.discount {
            discount.validate()?;
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Name is required"));
            }
        }
        if let Some(slug) = &patch.slug {
            product.slug = Slug::new(slug)?.into_string();
        }
        if let Some(sku) = &patch.sku {
            product.sku = Sku::new(sku.as_str())?.into_string();
        }

        assign!(
            name_ar, short_description, short_description_ar, description, description_ar,
            base_price, discount, currency, main_image, image_gallery, stock, availability,
            category, category_ar, brand, brand_ar, tags, tags_ar, sizes, colors,
            specifications, specifications_ar, variants, is_exclusive, toplay,
        );
        assign_some!(
            video, sub_category, sub_category_ar, product_type, secondtype, secondtype_ar,
            thirdtype, thirdtype_ar, material, weight, dimensions, warranty, return_policy, shop,
        );
        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }

        product.final_price = product.discount.apply(product.base_price);
        product.touch();
        Ok(())
    }
}

/// Compact projection used by search suggestions, carts and wishlists.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub name_ar: String,
    pub slug: String,
    pub main_image: String,
    pub final_price: f64,
    pub currency: String,
    pub stock: i32,
    pub availability: Availability,
    pub category: String,
    pub category_ar: String,
    pub brand: String,
    pub brand_ar: String,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            name_ar: p.name_ar.clone(),
            slug: p.slug.clone(),
            main_image: p.main_image.clone(),
            final_price: p.final_price,
            currency: p.currency.clone(),
            stock: p.stock,
            availability: p.availability,
            category: p.category.clone(),
            category_ar: p.category_ar.clone(),
            brand: p.brand.clone(),
            brand_ar: p.brand_ar.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn new_product(name: &str, sku: &str) -> NewProduct {
        serde_json::from_value(json!({
            "name": name,
            "nameAr": format!("{name} (ar)"),
            "slug": name.to_lowercase().replace(' ', "-"),
            "shortDescription": "short",
            "shortDescriptionAr": "short ar",
            "description": "long",
            "descriptionAr": "long ar",
            "basePrice": 100.0,
            "mainImage": "https://img.example/p.jpg",
            "stock": 5,
            "sku": sku,
            "category": "Shoes",
            "categoryAr": "أحذية",
            "brand": "Acme",
            "brandAr": "أكمي"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_derives_final_price() {
        let mut new = new_product("Trail Runner", "TR-1");
        new.discount = Discount { kind: DiscountKind::Percentage, value: 25.0 };
        let p = Product::create(new).unwrap();
        assert_eq!(p.final_price, 75.0);
        assert_eq!(p.slug, "trail-runner");
        assert_eq!(p.currency, "EGP");
        assert_eq!(p.availability, Availability::InStock);
        assert_eq!(p.average_rating, 0.0);
    }

    #[test]
    fn test_fixed_discount_never_negative() {
        let d = Discount { kind: DiscountKind::Fixed, value: 150.0 };
        assert_eq!(d.apply(100.0), 0.0);
        let d = Discount { kind: DiscountKind::Fixed, value: 19.99 };
        assert_eq!(d.apply(100.0), 80.01);
    }

    #[test]
    fn test_invalid_discount_rejected() {
        let mut new = new_product("Sandal", "SA-1");
        new.discount = Discount { kind: DiscountKind::Percentage, value: 120.0 };
        assert!(Product::create(new).is_err());
    }

    #[test]
    fn test_patch_reprices_and_keeps_rest() {
        let mut p = Product::create(new_product("Boot", "BO-1")).unwrap();
        let patch: ProductPatch = serde_json::from_value(json!({
            "basePrice": 200.0,
            "discount": { "type": "fixed", "value": 50 },
            "material": "Leather"
        }))
        .unwrap();
        patch.apply(&mut p).unwrap();
        assert_eq!(p.final_price, 150.0);
        assert_eq!(p.material.as_deref(), Some("Leather"));
        assert_eq!(p.name, "Boot");
    }

    #[test]
    fn test_patch_rejects_negative_stock() {
        let mut p = Product::create(new_product("Boot", "BO-1")).unwrap();
        let patch = ProductPatch { stock: Some(-1), ..Default::default() };
        assert!(patch.apply(&mut p).is_err());
        assert_eq!(p.stock, 5);
    }

    #[test]
    fn test_availability_roundtrip_names() {
        for a in Availability::ALL {
            assert_eq!(Availability::parse(a.as_str()), Some(a));
        }
        assert_eq!(Availability::parse("sold"), None);
    }
}
