//! Product catalog queries: filtering, sorting, pagination and filter options.
//!
//! The same [`ProductFilter`] drives both storage backends: the in-memory
//! store evaluates [`ProductFilter::matches`], Postgres renders it through
//! [`ProductFilter::push_where`].

pub mod filter;
pub mod options;
pub mod pagination;
pub mod sql;

pub use filter::{ProductFilter, ProductListParams, ProductQuery, SortMode};
pub use options::{FilterOptions, FilterValues, PriceRange};
pub use pagination::{Page, PageMeta, PageRequest};
