//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{MAX_COMMENT_LENGTH, MAX_RATING, MIN_RATING};
use crate::error::AppError;

/// SKU (Stock Keeping Unit) value object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, SkuError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > 64 { return Err(SkuError::TooLong); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_string(self) -> String { self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SkuError { Empty, TooLong }
impl std::error::Error for SkuError {}
impl fmt::Display for SkuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "SKU is required"), Self::TooLong => write!(f, "SKU is too long") }
    }
}

impl From<SkuError> for AppError {
    fn from(e: SkuError) -> Self { AppError::validation(e.to_string()) }
}

/// URL-safe product handle, stored lowercased
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: &str) -> Result<Self, AppError> {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return Err(AppError::validation("Slug is required"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(AppError::validation("Slug must not contain whitespace"));
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_string(self) -> String { self.0 }
}

/// A 1 to 5 rating. Fractional values are accepted.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(AppError::validation("Rating must be a number between 1 and 5"));
        }
        Ok(Self(value))
    }

    /// Missing ratings get the same message as out-of-range ones.
    pub fn required(value: Option<f64>) -> Result<Self, AppError> {
        value.map_or_else(|| Err(AppError::validation("Rating must be a number between 1 and 5")), Self::new)
    }

    pub fn value(&self) -> f64 { self.0 }
}

/// Trim and cut a free-text comment to [`MAX_COMMENT_LENGTH`] characters.
pub fn sanitize_comment(comment: Option<&str>) -> String {
    comment
        .map(|c| c.trim().chars().take(MAX_COMMENT_LENGTH).collect())
        .unwrap_or_default()
}

/// Emails are compared trimmed and lowercased everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize, then reject anything that is not an address.
pub fn parse_email(email: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    if !validator::validate_email(email.as_str()) {
        return Err(AppError::validation("A valid email is required"));
    }
    Ok(email)
}
