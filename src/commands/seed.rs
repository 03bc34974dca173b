//! Seed command: bulk-insert products from a JSON file.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use validator::Validate;

use crate::config::Config;
use crate::domain::{NewProduct, Product};
use crate::store::Store;

pub async fn execute(file: &Path, config: Config) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let products = parse_products(&raw)?;

    let pool = super::connect(&config).await?;
    super::MIGRATOR.run(&pool).await.context("migration failed")?;
    let added = insert(&Store::postgres(pool), products).await?;

    tracing::info!(added, file = %file.display(), "seed completed");
    println!("{added} product(s) added");
    Ok(())
}

/// Accept a single product object or an array of them; all must be valid.
fn parse_products(raw: &str) -> anyhow::Result<Vec<Product>> {
    let value: Value = serde_json::from_str(raw).context("seed file is not valid JSON")?;
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => bail!("seed file must contain a product object or an array of products"),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let new: NewProduct =
                serde_json::from_value(item).with_context(|| format!("product #{i} has an invalid shape"))?;
            new.validate().with_context(|| format!("product #{i} failed validation"))?;
            Product::create(new).map_err(|e| anyhow::anyhow!("product #{i}: {e}"))
        })
        .collect()
}

async fn insert(store: &Store, products: Vec<Product>) -> anyhow::Result<usize> {
    for product in &products {
        store
            .products
            .save(product)
            .await
            .map_err(|e| anyhow::anyhow!("failed to insert {}: {e}", product.sku))?;
    }
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json(sku: &str) -> Value {
        json!({
            "name": "Trail Runner",
            "nameAr": "حذاء",
            "slug": format!("trail-runner-{sku}"),
            "shortDescription": "Light",
            "shortDescriptionAr": "خفيف",
            "description": "A light trail shoe",
            "descriptionAr": "حذاء خفيف",
            "basePrice": 120.0,
            "mainImage": "/img/trail.png",
            "stock": 4,
            "sku": sku,
            "category": "Shoes",
            "categoryAr": "أحذية",
            "brand": "Acme",
            "brandAr": "أكمي"
        })
    }

    #[test]
    fn test_parse_single_object_and_array() {
        assert_eq!(parse_products(&product_json("A-1").to_string()).unwrap().len(), 1);
        let many = json!([product_json("A-1"), product_json("A-2")]);
        assert_eq!(parse_products(&many.to_string()).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_invalid_entries() {
        let mut bad = product_json("A-3");
        bad["name"] = json!("");
        assert!(parse_products(&json!([product_json("A-1"), bad]).to_string()).is_err());
        assert!(parse_products("42").is_err());
        assert!(parse_products("{not json").is_err());
    }

    #[tokio::test]
    async fn test_insert_into_store() {
        let store = Store::in_memory();
        let products = parse_products(&json!([product_json("B-1"), product_json("B-2")]).to_string()).unwrap();
        assert_eq!(insert(&store, products).await.unwrap(), 2);
        assert_eq!(store.products.count().await.unwrap(), 2);
    }
}
