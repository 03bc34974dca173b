use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Json, FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{excluded_assignments, to_i64, to_u64, PgStore};
use crate::catalog::{FilterValues, Page, ProductFilter, ProductQuery, SortMode};
use crate::domain::{Availability, Color, Dimensions, Discount, Product, Review};
use crate::error::AppResult;
use crate::store::ProductStore;

/// Column order shared by the SELECT list and the INSERT binds.
const PRODUCT_COLUMNS: [&str; 49] = [
    "id",
    "name",
    "name_ar",
    "slug",
    "short_description",
    "short_description_ar",
    "description",
    "description_ar",
    "base_price",
    "discount",
    "final_price",
    "currency",
    "main_image",
    "image_gallery",
    "video",
    "stock",
    "sku",
    "availability",
    "category",
    "category_ar",
    "sub_category",
    "sub_category_ar",
    "brand",
    "brand_ar",
    "product_type",
    "secondtype",
    "secondtype_ar",
    "thirdtype",
    "thirdtype_ar",
    "tags",
    "tags_ar",
    "sizes",
    "colors",
    "average_rating",
    "total_reviews",
    "material",
    "weight",
    "dimensions",
    "warranty",
    "return_policy",
    "specifications",
    "specifications_ar",
    "variants",
    "reviews",
    "shop",
    "is_exclusive",
    "toplay",
    "created_at",
    "updated_at",
];

fn select_list() -> String {
    PRODUCT_COLUMNS.join(", ")
}

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    name_ar: String,
    slug: String,
    short_description: String,
    short_description_ar: String,
    description: String,
    description_ar: String,
    base_price: f64,
    discount: Json<Discount>,
    final_price: f64,
    currency: String,
    main_image: String,
    image_gallery: Vec<String>,
    video: Option<String>,
    stock: i32,
    sku: String,
    availability: String,
    category: String,
    category_ar: String,
    sub_category: Option<String>,
    sub_category_ar: Option<String>,
    brand: String,
    brand_ar: String,
    product_type: Option<String>,
    secondtype: Option<String>,
    secondtype_ar: Option<String>,
    thirdtype: Option<String>,
    thirdtype_ar: Option<String>,
    tags: Vec<String>,
    tags_ar: Vec<String>,
    sizes: Vec<String>,
    colors: Json<Vec<Color>>,
    average_rating: f64,
    total_reviews: i32,
    material: Option<String>,
    weight: Option<String>,
    dimensions: Option<Json<Dimensions>>,
    warranty: Option<String>,
    return_policy: Option<String>,
    specifications: Json<Value>,
    specifications_ar: Json<Value>,
    variants: Json<Vec<Value>>,
    reviews: Json<Vec<Review>>,
    shop: Option<String>,
    is_exclusive: bool,
    toplay: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            name_ar: r.name_ar,
            slug: r.slug,
            short_description: r.short_description,
            short_description_ar: r.short_description_ar,
            description: r.description,
            description_ar: r.description_ar,
            base_price: r.base_price,
            discount: r.discount.0,
            final_price: r.final_price,
            currency: r.currency,
            main_image: r.main_image,
            image_gallery: r.image_gallery,
            video: r.video,
            stock: r.stock,
            sku: r.sku,
            availability: Availability::parse(&r.availability).unwrap_or_default(),
            category: r.category,
            category_ar: r.category_ar,
            sub_category: r.sub_category,
            sub_category_ar: r.sub_category_ar,
            brand: r.brand,
            brand_ar: r.brand_ar,
            product_type: r.product_type,
            secondtype: r.secondtype,
            secondtype_ar: r.secondtype_ar,
            thirdtype: r.thirdtype,
            thirdtype_ar: r.thirdtype_ar,
            tags: r.tags,
            tags_ar: r.tags_ar,
            sizes: r.sizes,
            colors: r.colors.0,
            average_rating: r.average_rating,
            total_reviews: r.total_reviews,
            material: r.material,
            weight: r.weight,
            dimensions: r.dimensions.map(|d| d.0),
            warranty: r.warranty,
            return_policy: r.return_policy,
            specifications: r.specifications.0,
            specifications_ar: r.specifications_ar.0,
            variants: r.variants.0,
            reviews: r.reviews.0,
            shop: r.shop,
            is_exclusive: r.is_exclusive,
            toplay: r.toplay,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn select(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM products", select_list()));
    filter.push_where(&mut qb);
    qb
}

#[async_trait]
impl ProductStore for PgStore {
    async fn save(&self, product: &Product) -> AppResult<()> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO products ({}) ", select_list()));
        qb.push_values(std::iter::once(product), |mut b, p| {
            b.push_bind(p.id)
                .push_bind(p.name.clone())
                .push_bind(p.name_ar.clone())
                .push_bind(p.slug.clone())
                .push_bind(p.short_description.clone())
                .push_bind(p.short_description_ar.clone())
                .push_bind(p.description.clone())
                .push_bind(p.description_ar.clone())
                .push_bind(p.base_price)
                .push_bind(Json(p.discount.clone()))
                .push_bind(p.final_price)
                .push_bind(p.currency.clone())
                .push_bind(p.main_image.clone())
                .push_bind(p.image_gallery.clone())
                .push_bind(p.video.clone())
                .push_bind(p.stock)
                .push_bind(p.sku.clone())
                .push_bind(p.availability.as_str())
                .push_bind(p.category.clone())
                .push_bind(p.category_ar.clone())
                .push_bind(p.sub_category.clone())
                .push_bind(p.sub_category_ar.clone())
                .push_bind(p.brand.clone())
                .push_bind(p.brand_ar.clone())
                .push_bind(p.product_type.clone())
                .push_bind(p.secondtype.clone())
                .push_bind(p.secondtype_ar.clone())
                .push_bind(p.thirdtype.clone())
                .push_bind(p.thirdtype_ar.clone())
                .push_bind(p.tags.clone())
                .push_bind(p.tags_ar.clone())
                .push_bind(p.sizes.clone())
                .push_bind(Json(p.colors.clone()))
                .push_bind(p.average_rating)
                .push_bind(p.total_reviews)
                .push_bind(p.material.clone())
                .push_bind(p.weight.clone())
                .push_bind(p.dimensions.clone().map(Json))
                .push_bind(p.warranty.clone())
                .push_bind(p.return_policy.clone())
                .push_bind(Json(p.specifications.clone()))
                .push_bind(Json(p.specifications_ar.clone()))
                .push_bind(Json(p.variants.clone()))
                .push_bind(Json(p.reviews.clone()))
                .push_bind(p.shop.clone())
                .push_bind(p.is_exclusive)
                .push_bind(p.toplay)
                .push_bind(p.created_at)
                .push_bind(p.updated_at);
        });
        qb.push(" ON CONFLICT (id) DO UPDATE SET ")
            .push(excluded_assignments(&PRODUCT_COLUMNS, &["id", "created_at"]));
        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", select_list()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE slug = $1", select_list()))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = ANY($1)", select_list()))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &ProductQuery) -> AppResult<Page<Product>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        query.filter.push_where(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = select(&query.filter);
        qb.push(" ORDER BY ")
            .push(query.sort.order_by())
            .push(" LIMIT ")
            .push_bind(to_i64(query.page.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(query.page.offset()));
        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page { items: rows.into_iter().map(Product::from).collect(), total: to_u64(total) })
    }

    async fn search(&self, filter: &ProductFilter, limit: u64) -> AppResult<Vec<Product>> {
        let mut qb = select(filter);
        qb.push(" ORDER BY ")
            .push(SortMode::Newest.order_by())
            .push(" LIMIT ")
            .push_bind(to_i64(limit));
        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn filter_values(&self) -> AppResult<FilterValues> {
        let distinct = |sql: &'static str| sqlx::query_scalar::<_, String>(sql).fetch_all(&self.pool);

        let (
            categories,
            brands,
            sizes,
            colors,
            materials,
            shops,
            product_types,
            secondtypes,
            secondtypes_ar,
            thirdtypes,
            thirdtypes_ar,
            (min_price, max_price),
        ) = tokio::try_join!(
            distinct("SELECT DISTINCT category FROM products WHERE category IS NOT NULL"),
            distinct("SELECT DISTINCT brand FROM products WHERE brand IS NOT NULL"),
            distinct("SELECT DISTINCT s FROM products, unnest(sizes) AS s WHERE s IS NOT NULL"),
            distinct(
                "SELECT DISTINCT c->>'name' FROM products, jsonb_array_elements(colors) AS c \
                 WHERE c->>'name' IS NOT NULL"
            ),
            distinct("SELECT DISTINCT material FROM products WHERE material IS NOT NULL"),
            distinct("SELECT DISTINCT shop FROM products WHERE shop IS NOT NULL"),
            distinct("SELECT DISTINCT product_type FROM products WHERE product_type IS NOT NULL"),
            distinct("SELECT DISTINCT secondtype FROM products WHERE secondtype IS NOT NULL"),
            distinct("SELECT DISTINCT secondtype_ar FROM products WHERE secondtype_ar IS NOT NULL"),
            distinct("SELECT DISTINCT thirdtype FROM products WHERE thirdtype IS NOT NULL"),
            distinct("SELECT DISTINCT thirdtype_ar FROM products WHERE thirdtype_ar IS NOT NULL"),
            sqlx::query_as::<_, (Option<f64>, Option<f64>)>(
                "SELECT MIN(final_price), MAX(final_price) FROM products"
            )
            .fetch_one(&self.pool),
        )?;

        Ok(FilterValues {
            categories,
            brands,
            sizes,
            colors,
            materials,
            shops,
            product_types,
            secondtypes,
            secondtypes_ar,
            thirdtypes,
            thirdtypes_ar,
            price_range: min_price.zip(max_price),
        })
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_u64(total))
    }

    async fn count_low_stock(&self, threshold: i32) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock < $1")
            .bind(threshold)
            .fetch_one(&self.pool)
            .await?;
        Ok(to_u64(total))
    }
}
