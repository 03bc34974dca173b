//! Page requests and page metadata shared by list endpoints.

use serde::Serialize;

use crate::config::MAX_PAGE_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Lenient parsing from raw query values. Anything non-numeric falls back
    /// to the defaults, `page < 1` becomes 1, `limit < 1` becomes
    /// `default_limit` and limits are capped at [`MAX_PAGE_SIZE`].
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map_or(1, |p| p as u64);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .map_or(default_limit, |l| l as u64)
            .min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Slice an already sorted, fully materialized result set.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

/// One page of results plus the total match count.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), total: self.total }
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 { 0 } else { total.div_ceil(limit) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total_pages(total, request.limit);
        Self {
            total_pages,
            current_page: request.page,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_and_clamps() {
        assert_eq!(PageRequest::parse(None, None, 20), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::parse(Some("abc"), Some("x"), 20), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::parse(Some("0"), Some("0"), 20), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::parse(Some("-3"), Some("-1"), 10), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::parse(Some("3"), Some("1000"), 20), PageRequest { page: 3, limit: MAX_PAGE_SIZE });
    }

    #[test]
    fn test_offset_and_slice() {
        let req = PageRequest { page: 2, limit: 2 };
        assert_eq!(req.offset(), 2);
        assert_eq!(req.slice(vec![1, 2, 3, 4, 5]), vec![3, 4]);
        assert_eq!(PageRequest { page: 9, limit: 2 }.slice(vec![1, 2, 3]), Vec::<i32>::new());
    }

    #[test]
    fn test_meta() {
        let meta = PageMeta::new(PageRequest { page: 1, limit: 2 }, 5);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);

        let last = PageMeta::new(PageRequest { page: 3, limit: 2 }, 5);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);

        let empty = PageMeta::new(PageRequest { page: 1, limit: 20 }, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }
}
