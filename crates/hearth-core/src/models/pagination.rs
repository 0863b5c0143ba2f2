use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Admin list page size.
pub const PER_PAGE: u32 = 20;

/// `?page=` query parameter, 1-based.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageRequest {
    pub page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32) -> Self {
        Self { page: Some(page) }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self, per_page: u32) -> i64 {
        i64::from(self.page() - 1) * i64::from(per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, per_page: u32, total: i64) -> Self {
        let per = i64::from(per_page.max(1));
        let last_page = ((total + per - 1) / per).max(1) as u32;
        Self {
            data,
            current_page: request.page(),
            per_page,
            total,
            last_page,
        }
    }

    /// Slice an in-memory, already sorted collection.
    pub fn from_sorted(items: Vec<T>, request: PageRequest, per_page: u32) -> Self {
        let total = items.len() as i64;
        let data = items
            .into_iter()
            .skip(request.offset(per_page) as usize)
            .take(per_page as usize)
            .collect();
        Self::new(data, request, per_page, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_first() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.offset(PER_PAGE), 0);
        assert_eq!(PageRequest::new(0).page(), 1);
    }

    #[test]
    fn test_from_sorted_slices_and_counts() {
        let items: Vec<u32> = (1..=45).collect();
        let page = Page::from_sorted(items, PageRequest::new(3), PER_PAGE);
        assert_eq!(page.data, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn test_empty_has_one_page() {
        let page: Page<u32> = Page::from_sorted(vec![], PageRequest::default(), PER_PAGE);
        assert_eq!(page.last_page, 1);
        assert!(page.data.is_empty());
    }
}
