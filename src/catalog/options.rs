//! Distinct attribute values offered as listing filters.

use serde::Serialize;

use crate::config::FALLBACK_PRICE_RANGE;
use crate::domain::Availability;

/// Raw distinct values as read from storage, possibly with blanks and duplicates.
#[derive(Clone, Debug, Default)]
pub struct FilterValues {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub shops: Vec<String>,
    pub product_types: Vec<String>,
    pub secondtypes: Vec<String>,
    pub secondtypes_ar: Vec<String>,
    pub thirdtypes: Vec<String>,
    pub thirdtypes_ar: Vec<String>,
    /// `(min, max)` of final prices, `None` for an empty catalog
    pub price_range: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub shops: Vec<String>,
    pub product_types: Vec<String>,
    #[serde(rename = "secondTypes")]
    pub secondtypes: Vec<String>,
    #[serde(rename = "secondTypesAr")]
    pub secondtypes_ar: Vec<String>,
    #[serde(rename = "thirdTypes")]
    pub thirdtypes: Vec<String>,
    #[serde(rename = "thirdTypesAr")]
    pub thirdtypes_ar: Vec<String>,
    pub price_range: PriceRange,
    pub availability: Vec<&'static str>,
}

impl From<FilterValues> for FilterOptions {
    fn from(v: FilterValues) -> Self {
        let (min_price, max_price) = v.price_range.unwrap_or(FALLBACK_PRICE_RANGE);
        Self {
            categories: normalize(v.categories),
            brands: normalize(v.brands),
            sizes: normalize(v.sizes),
            colors: normalize(v.colors),
            materials: normalize(v.materials),
            shops: normalize(v.shops),
            product_types: normalize(v.product_types),
            secondtypes: normalize(v.secondtypes),
            secondtypes_ar: normalize(v.secondtypes_ar),
            thirdtypes: normalize(v.thirdtypes),
            thirdtypes_ar: normalize(v.thirdtypes_ar),
            price_range: PriceRange { min_price, max_price },
            availability: Availability::ALL.iter().map(Availability::as_str).collect(),
        }
    }
}

fn normalize(mut values: Vec<String>) -> Vec<String> {
    values.retain(|v| !v.trim().is_empty());
    values.sort();
    values.dedup();
    values
}
