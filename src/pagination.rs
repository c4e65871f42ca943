use serde::Serialize;

use crate::filters::{FilterHelper, FilterValues};

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One entry of the pagination bar. `page == None` is an ellipsis.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageLink {
    pub page: Option<usize>,
    pub url: Option<String>,
    pub active: bool,
}

/// Page numbers of the pagination bar. The rows themselves are rendered
/// separately by the table.
#[derive(Debug, Serialize)]
pub struct Paginated {
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl Paginated {
    pub fn new(current_page: usize, total_items: usize, per_page: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let total_pages = total_items.div_ceil(per_page.max(1));

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            pages,
            page: current_page,
            total: total_items,
        }
    }

    /// Pagination links that keep the current filters in the query string.
    pub fn links(&self, helper: &FilterHelper, path: &str, values: &FilterValues) -> Vec<PageLink> {
        self.pages
            .iter()
            .map(|page| PageLink {
                page: *page,
                url: page.map(|p| helper.page_url(path, values, p)),
                active: *page == Some(self.page),
            })
            .collect()
    }
}
