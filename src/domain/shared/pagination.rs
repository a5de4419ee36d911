use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_PAGE_SIZE: u32 = 100;

/// Default items per page
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  /// Page number (1-indexed)
  pub page: u32,
  /// Items per page (max 100)
  pub size: u32,
}

impl Pagination {
  /// Page is clamped to a minimum of 1 and size to 1..=100
  pub fn new(page: u32, size: u32) -> Self {
    Self {
      page: page.max(1),
      size: size.clamp(1, MAX_PAGE_SIZE),
    }
  }

  pub fn offset(&self) -> usize {
    (self.page as usize - 1) * self.size as usize
  }

  pub fn limit(&self) -> usize {
    self.size as usize
  }
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      page: 1,
      size: DEFAULT_PAGE_SIZE,
    }
  }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
  pub page: Option<u32>,
  pub size: Option<u32>,
}

impl From<PaginationParams> for Pagination {
  fn from(params: PaginationParams) -> Self {
    Self::new(
      params.page.unwrap_or(1),
      params.size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
  }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
  /// Items for the current page
  pub items: Vec<T>,
  /// Total count across all pages
  pub total: u64,
  /// Current page number
  pub page: u32,
  /// Items per page
  pub size: u32,
  /// Total number of pages
  pub pages: u32,
}

impl<T> Page<T> {
  /// Slices an already materialised result set into one page
  pub fn paginate(all: Vec<T>, pagination: Pagination) -> Self {
    let total = all.len() as u64;
    let items: Vec<T> = all
      .into_iter()
      .skip(pagination.offset())
      .take(pagination.limit())
      .collect();

    Self {
      items,
      total,
      page: pagination.page,
      size: pagination.size,
      pages: total.div_ceil(pagination.size as u64) as u32,
    }
  }

  /// Converts the items while keeping the page metadata
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items: self.items.into_iter().map(f).collect(),
      total: self.total,
      page: self.page,
      size: self.size,
      pages: self.pages,
    }
  }

  pub fn has_next(&self) -> bool {
    self.page < self.pages
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offset_calculation() {
    assert_eq!(Pagination::new(1, 10).offset(), 0);
    assert_eq!(Pagination::new(2, 10).offset(), 10);
    assert_eq!(Pagination::new(3, 25).offset(), 50);
  }

  #[test]
  fn clamps_page_and_size() {
    let p = Pagination::new(0, 0);
    assert_eq!(p.page, 1);
    assert_eq!(p.size, 1);

    let p = Pagination::new(1, 999);
    assert_eq!(p.size, 100);
  }

  #[test]
  fn defaults_from_empty_params() {
    let p: Pagination = PaginationParams::default().into();
    assert_eq!(p, Pagination::new(1, 50));
  }

  #[test]
  fn paginate_slices_items() {
    let page = Page::paginate((1..=25).collect::<Vec<_>>(), Pagination::new(2, 10));
    assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
    assert_eq!(page.total, 25);
    assert_eq!(page.pages, 3);
    assert!(page.has_next());

    let last = Page::paginate((1..=25).collect::<Vec<_>>(), Pagination::new(3, 10));
    assert_eq!(last.items, (21..=25).collect::<Vec<_>>());
    assert!(!last.has_next());
  }

  #[test]
  fn empty_result_is_a_valid_page() {
    let page: Page<i32> = Page::paginate(vec![], Pagination::default());
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 0);
    assert_eq!(page.page, 1);
  }

  #[test]
  fn page_beyond_end_is_empty() {
    let page = Page::paginate(vec![1, 2, 3], Pagination::new(5, 10));
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
  }
}
