//! Product listing parameters: parsing, predicate evaluation and ordering.
//!
//! Query values arrive as raw strings so that malformed numbers degrade to
//! "no constraint" instead of rejecting the whole request. All matching is
//! literal; user input is never interpreted as a pattern.

use std::cmp::Ordering;

use serde::Deserialize;

use super::pagination::PageRequest;
use crate::config::{DEFAULT_PRODUCT_PAGE_SIZE, RATING_BUCKET_WIDTH};
use crate::domain::Product;

/// Raw query string of `GET /api/products`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub product_type: Option<String>,
    pub secondtype: Option<String>,
    pub thirdtype: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub rating: Option<String>,
    pub sizes: Option<String>,
    pub colors: Option<String>,
    pub availability: Option<String>,
    pub material: Option<String>,
    pub shop: Option<String>,
    pub exclusive_only: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
    Rating,
    Popular,
    Name,
}

impl SortMode {
    /// Unknown or missing values sort newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating") => Self::Rating,
            Some("popular") => Self::Popular,
            Some("name") => Self::Name,
            _ => Self::Newest,
        }
    }

    /// Total order used by the in-memory store; ties fall back to id.
    /// Names compare case-insensitively, like `LOWER(name)` in Postgres.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            Self::PriceAsc => a.final_price.total_cmp(&b.final_price),
            Self::PriceDesc => b.final_price.total_cmp(&a.final_price),
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Rating => b.average_rating.total_cmp(&a.average_rating),
            Self::Popular => b.total_reviews.cmp(&a.total_reviews),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Parsed predicates. Empty lists and `None` mean "no constraint".
///
/// Whole-string and substring lists are stored lowercased.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub product_types: Vec<String>,
    pub secondtypes: Vec<String>,
    pub thirdtypes: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub rating_buckets: Vec<f64>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub availability: Vec<String>,
    pub materials: Vec<String>,
    pub shops: Vec<String>,
    pub exclusive_only: bool,
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortMode,
    pub page: PageRequest,
}

impl ProductListParams {
    pub fn into_query(self) -> ProductQuery {
        let lower = |raw: &Option<String>| -> Vec<String> {
            split_list(raw.as_deref()).into_iter().map(|v| v.to_lowercase()).collect()
        };
        let filter = ProductFilter {
            categories: lower(&self.category),
            sub_categories: lower(&self.sub_category),
            product_types: lower(&self.product_type),
            secondtypes: lower(&self.secondtype),
            thirdtypes: lower(&self.thirdtype),
            brands: lower(&self.brand),
            min_price: parse_number(self.min_price.as_deref()),
            max_price: parse_number(self.max_price.as_deref()),
            rating_buckets: split_list(self.rating.as_deref())
                .iter()
                .filter_map(|r| parse_number(Some(r)))
                .collect(),
            sizes: split_list(self.sizes.as_deref()),
            colors: lower(&self.colors),
            availability: split_list(self.availability.as_deref()),
            materials: lower(&self.material),
            shops: lower(&self.shop),
            exclusive_only: self.exclusive_only.as_deref() == Some("true"),
            search: search_term(self.search.as_deref()),
        };
        ProductQuery {
            filter,
            sort: SortMode::parse(self.sort.as_deref()),
            page: PageRequest::parse(self.page.as_deref(), self.limit.as_deref(), DEFAULT_PRODUCT_PAGE_SIZE),
        }
    }
}

impl ProductFilter {
    /// Free-text search only, as used by quick search suggestions.
    pub fn search_only(term: &str) -> Self {
        Self { search: search_term(Some(term)), ..Self::default() }
    }

    pub fn matches(&self, p: &Product) -> bool {
        whole(&self.categories, Some(p.category.as_str()))
            && whole(&self.sub_categories, p.sub_category.as_deref())
            && whole_trimmed(&self.product_types, p.product_type.as_deref())
            && whole_trimmed(&self.secondtypes, p.secondtype.as_deref())
            && whole_trimmed(&self.thirdtypes, p.thirdtype.as_deref())
            && whole(&self.brands, Some(p.brand.as_str()))
            && self.min_price.map_or(true, |min| p.final_price >= min)
            && self.max_price.map_or(true, |max| p.final_price <= max)
            && self.matches_rating(p.average_rating)
            && (self.sizes.is_empty() || p.sizes.iter().any(|s| self.sizes.contains(s)))
            && (self.colors.is_empty() || p.colors.iter().any(|c| contains_any(&self.colors, &c.name)))
            && (self.availability.is_empty() || self.availability.iter().any(|a| a == p.availability.as_str()))
            && (self.materials.is_empty() || p.material.as_deref().is_some_and(|m| contains_any(&self.materials, m)))
            && (self.shops.is_empty() || p.shop.as_deref().is_some_and(|s| contains_any(&self.shops, s)))
            && (!self.exclusive_only || p.is_exclusive)
            && self.search.as_deref().map_or(true, |needle| matches_search(p, needle))
    }

    fn matches_rating(&self, average: f64) -> bool {
        self.rating_buckets.is_empty()
            || self
                .rating_buckets
                .iter()
                .any(|r| average >= *r && average < r + RATING_BUCKET_WIDTH)
    }
}

/// Comma-separated list, entries trimmed, empties dropped.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok()).filter(|v| v.is_finite())
}

fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn whole(wanted: &[String], value: Option<&str>) -> bool {
    wanted.is_empty() || value.is_some_and(|v| wanted.contains(&v.to_lowercase()))
}

fn whole_trimmed(wanted: &[String], value: Option<&str>) -> bool {
    whole(wanted, value.map(str::trim))
}

fn contains_any(needles: &[String], haystack: &str) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn matches_search(p: &Product, needle: &str) -> bool {
    let hit = |v: &str| v.to_lowercase().contains(needle);
    [
        &p.name,
        &p.name_ar,
        &p.description,
        &p.description_ar,
        &p.short_description,
        &p.short_description_ar,
        &p.category,
        &p.category_ar,
        &p.brand,
        &p.brand_ar,
        &p.sku,
    ]
    .into_iter()
    .any(|v| hit(v.as_str()))
        || p.tags.iter().chain(&p.tags_ar).any(|t| hit(t.as_str()))
}
