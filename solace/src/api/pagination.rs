//! Page-number pagination applied to list endpoints after ordering.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters accepted by paginated list endpoints.
///
/// `page` is 1-based; `size` is clamped to `1..=100` and defaults to 50.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageParams {
    pub fn normalize(mut self) -> Self {
        self.page = self.page.max(1);
        self.size = self.size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// Pagination metadata returned alongside the page items.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PageMeta {
    /// 1-based index of this page.
    pub page: u32,
    /// Requested page size after clamping.
    pub size: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages (0 when there are no items).
    pub pages: u32,
}

/// Slice one page out of an already-ordered item list.
///
/// Pages past the end yield an empty item list with truthful metadata.
pub fn paginate<T>(items: Vec<T>, params: &PageParams) -> (Vec<T>, PageMeta) {
    let params = params.clone().normalize();
    let total = items.len() as u64;
    let pages = total.div_ceil(params.size as u64) as u32;

    let offset = (params.page as usize - 1).saturating_mul(params.size as usize);
    let page_items: Vec<T> = items
        .into_iter()
        .skip(offset)
        .take(params.size as usize)
        .collect();

    (
        page_items,
        PageMeta {
            page: params.page,
            size: params.size,
            total,
            pages,
        },
    )
}
