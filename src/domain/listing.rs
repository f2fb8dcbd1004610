use super::{Product, ProductId, ProductPage};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// What the product table currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    pub current_page: u32,
    pub page_size: u32,
    pub items: Vec<Product>,
    pub total_count: u64,
    /// Set while the table shows search results instead of a page.
    pub active_query: Option<String>,
}

impl ListSnapshot {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 0,
            page_size,
            items: Vec::new(),
            total_count: 0,
            active_query: None,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.active_query.is_some()
    }

    /// Replaces the table with a fetched page. Nothing of the previous state
    /// survives except what the page itself carries.
    pub fn apply_page(&mut self, page: u32, size: u32, fetched: ProductPage) {
        self.current_page = page;
        self.page_size = size;
        self.items = fetched.items;
        self.total_count = fetched.total_count;
        self.active_query = None;
    }

    /// Replaces the rows with search results. Results are unpaged, so the
    /// total and page position are left alone.
    pub fn apply_search(&mut self, query: String, results: Vec<Product>) {
        self.items = results;
        self.active_query = Some(query);
    }

    /// Drops the row for `id`, if shown. The total is not adjusted.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|product| product.id != Some(id));
    }
}

impl Default for ListSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
