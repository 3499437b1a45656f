use std::ops::Range;

/// Page cursor over a list of `len` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
  per_page: usize,
  page: usize,
}

impl Pager {
  pub fn new(per_page: usize) -> Self {
    Self {
      per_page: per_page.max(1),
      page: 0,
    }
  }

  pub fn per_page(&self) -> usize {
    self.per_page
  }

  /// Zero-based current page, clamped to `len`
  pub fn page(&self, len: usize) -> usize {
    self.page.min(self.total_pages(len) - 1)
  }

  /// Number of pages, at least 1 so an empty list still has a page to show
  pub fn total_pages(&self, len: usize) -> usize {
    len.div_ceil(self.per_page).max(1)
  }

  /// Row range of the current page
  pub fn range(&self, len: usize) -> Range<usize> {
    let start = self.page(len) * self.per_page;
    start..(start + self.per_page).min(len)
  }

  pub fn next(&mut self, len: usize) {
    self.page = (self.page(len) + 1).min(self.total_pages(len) - 1);
  }

  pub fn previous(&mut self, len: usize) {
    self.page = self.page(len).saturating_sub(1);
  }

  /// "Page 2 of 3", or `None` when everything fits on one page
  pub fn indicator(&self, len: usize) -> Option<String> {
    let total = self.total_pages(len);
    (total > 1).then(|| format!("Page {} of {}", self.page(len) + 1, total))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_total_pages() {
    let pager = Pager::new(20);
    assert_eq!(pager.total_pages(0), 1);
    assert_eq!(pager.total_pages(20), 1);
    assert_eq!(pager.total_pages(21), 2);
    assert_eq!(pager.total_pages(45), 3);
  }

  #[test]
  fn test_ranges_cover_all_rows() {
    let mut pager = Pager::new(20);
    assert_eq!(pager.range(45), 0..20);
    pager.next(45);
    assert_eq!(pager.range(45), 20..40);
    pager.next(45);
    assert_eq!(pager.range(45), 40..45);
    // Already on the last page
    pager.next(45);
    assert_eq!(pager.range(45), 40..45);
  }

  #[test]
  fn test_previous_stops_at_first_page() {
    let mut pager = Pager::new(20);
    pager.previous(45);
    assert_eq!(pager.page(45), 0);
  }

  #[test]
  fn test_page_clamped_when_list_shrinks() {
    let mut pager = Pager::new(20);
    pager.next(45);
    pager.next(45);
    assert_eq!(pager.page(45), 2);
    assert_eq!(pager.page(30), 1);
    assert_eq!(pager.range(30), 20..30);
    assert_eq!(pager.range(0), 0..0);
  }

  #[test]
  fn test_indicator_only_with_several_pages() {
    let mut pager = Pager::new(20);
    assert_eq!(pager.indicator(20), None);
    pager.next(45);
    assert_eq!(pager.indicator(45).as_deref(), Some("Page 2 of 3"));
  }

  #[test]
  fn test_zero_page_size_treated_as_one() {
    let pager = Pager::new(0);
    assert_eq!(pager.per_page(), 1);
    assert_eq!(pager.total_pages(3), 3);
  }
}
