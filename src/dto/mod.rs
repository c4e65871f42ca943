//! Page data handed from services to templates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::forms::field::FieldView;
use crate::pagination::PageLink;
use crate::table::TableView;

pub mod banners;
pub mod broadcasts;
pub mod orders;
pub mod product_groups;
pub mod svd;

/// Everything a filtered list page renders: filter form, table and pager.
#[derive(Debug, Serialize)]
pub struct ListPageData {
    pub table: TableView,
    pub pages: Vec<PageLink>,
    pub total: usize,
    /// Current filter values, first value per key.
    pub filters: BTreeMap<String, String>,
    pub filter_fields: Vec<FieldView>,
    /// List URL without any filter applied.
    pub reset_url: String,
}

/// A form to render, with inline and form-level errors.
#[derive(Debug, Serialize)]
pub struct FormData {
    pub action: String,
    pub fields: Vec<FieldView>,
    pub errors: Vec<String>,
}

/// List page with an inline create form (sellers, broadcasts).
#[derive(Debug, Serialize)]
pub struct ListWithFormPageData {
    pub list: ListPageData,
    pub form: FormData,
}
