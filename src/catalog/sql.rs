//! SQL rendering of [`ProductFilter`] and [`SortMode`] for the Postgres store.
//!
//! Every user value is bound as a parameter. Substring filters go through
//! [`like_pattern`] so `%`, `_` and `\` match themselves.

use sqlx::{Postgres, QueryBuilder};

use super::filter::{ProductFilter, SortMode};
use crate::config::RATING_BUCKET_WIDTH;

const SEARCH_COLUMNS: &str = "ARRAY[name, name_ar, description, description_ar, short_description, \
     short_description_ar, category, category_ar, brand, brand_ar, sku] || tags || tags_ar";

/// `%value%` with LIKE metacharacters escaped.
pub fn like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn like_patterns(values: &[String]) -> Vec<String> {
    values.iter().map(|v| like_pattern(v)).collect()
}

/// Prefixes each predicate with `WHERE` or `AND`.
struct Conditions<'q, 'args> {
    qb: &'q mut QueryBuilder<'args, Postgres>,
    empty: bool,
}

impl<'q, 'args> Conditions<'q, 'args> {
    fn next(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.qb.push(if self.empty { " WHERE " } else { " AND " });
        self.empty = false;
        &mut *self.qb
    }
}

impl ProductFilter {
    /// Append the `WHERE` clause (if any predicate is set) to `qb`.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut w = Conditions { qb, empty: true };

        for (column, values) in [
            ("category", &self.categories),
            ("sub_category", &self.sub_categories),
            ("brand", &self.brands),
        ] {
            if !values.is_empty() {
                w.next()
                    .push(format!("LOWER({column}) = ANY("))
                    .push_bind(values.clone())
                    .push(")");
            }
        }
        for (column, values) in [
            ("product_type", &self.product_types),
            ("secondtype", &self.secondtypes),
            ("thirdtype", &self.thirdtypes),
        ] {
            if !values.is_empty() {
                w.next()
                    .push(format!("LOWER(BTRIM({column})) = ANY("))
                    .push_bind(values.clone())
                    .push(")");
            }
        }

        if let Some(min) = self.min_price {
            w.next().push("final_price >= ").push_bind(min);
        }
        if let Some(max) = self.max_price {
            w.next().push("final_price <= ").push_bind(max);
        }

        if !self.rating_buckets.is_empty() {
            let qb = w.next();
            qb.push("(");
            for (i, bucket) in self.rating_buckets.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("(average_rating >= ")
                    .push_bind(*bucket)
                    .push(" AND average_rating < ")
                    .push_bind(bucket + RATING_BUCKET_WIDTH)
                    .push(")");
            }
            qb.push(")");
        }

        if !self.sizes.is_empty() {
            w.next().push("sizes && ").push_bind(self.sizes.clone());
        }
        if !self.colors.is_empty() {
            w.next()
                .push("EXISTS (SELECT 1 FROM jsonb_array_elements(colors) AS c WHERE c->>'name' ILIKE ANY(")
                .push_bind(like_patterns(&self.colors))
                .push("))");
        }
        if !self.availability.is_empty() {
            w.next()
                .push("availability = ANY(")
                .push_bind(self.availability.clone())
                .push(")");
        }
        for (column, values) in [("material", &self.materials), ("shop", &self.shops)] {
            if !values.is_empty() {
                w.next()
                    .push(format!("{column} ILIKE ANY("))
                    .push_bind(like_patterns(values))
                    .push(")");
            }
        }
        if self.exclusive_only {
            w.next().push("is_exclusive = TRUE");
        }
        if let Some(term) = &self.search {
            w.next()
                .push(format!("EXISTS (SELECT 1 FROM unnest({SEARCH_COLUMNS}) AS f(v) WHERE f.v ILIKE "))
                .push_bind(like_pattern(term))
                .push(")");
        }
    }
}

impl SortMode {
    /// `ORDER BY` body; always ends with `id` so pages never overlap.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::PriceAsc => "final_price ASC, id ASC",
            Self::PriceDesc => "final_price DESC, id ASC",
            Self::Newest => "created_at DESC, id ASC",
            Self::Rating => "average_rating DESC, id ASC",
            Self::Popular => "total_reviews DESC, id ASC",
            Self::Name => "LOWER(name) ASC, id ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filter: &ProductFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM products");
        filter.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_no_predicates_no_where() {
        assert_eq!(render(&ProductFilter::default()), "SELECT id FROM products");
    }

    #[test]
    fn test_predicates_are_and_joined_with_binds() {
        let filter = ProductFilter {
            categories: vec!["shoes".into()],
            product_types: vec!["sneakers".into()],
            min_price: Some(10.0),
            exclusive_only: true,
            ..Default::default()
        };
        assert_eq!(
            render(&filter),
            "SELECT id FROM products WHERE LOWER(category) = ANY($1) \
             AND LOWER(BTRIM(product_type)) = ANY($2) AND final_price >= $3 AND is_exclusive = TRUE"
        );
    }

    #[test]
    fn test_rating_buckets_or_group() {
        let filter = ProductFilter { rating_buckets: vec![3.0, 4.0], ..Default::default() };
        assert_eq!(
            render(&filter),
            "SELECT id FROM products WHERE ((average_rating >= $1 AND average_rating < $2) \
             OR (average_rating >= $3 AND average_rating < $4))"
        );
    }

    #[test]
    fn test_search_single_bind() {
        let sql = render(&ProductFilter::search_only("boot"));
        assert!(sql.contains("unnest(ARRAY[name, name_ar,"));
        assert!(sql.contains("|| tags || tags_ar"));
        assert!(sql.ends_with("WHERE f.v ILIKE $1)"));
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
        assert_eq!(like_pattern("red"), "%red%");
    }

    #[test]
    fn test_order_by_has_tiebreak() {
        let modes = [
            SortMode::PriceAsc,
            SortMode::PriceDesc,
            SortMode::Newest,
            SortMode::Rating,
            SortMode::Popular,
            SortMode::Name,
        ];
        assert!(modes.iter().all(|s| s.order_by().ends_with("id ASC")));
        assert_eq!(SortMode::Name.order_by(), "LOWER(name) ASC, id ASC");
    }
}
