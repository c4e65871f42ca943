//! Per-view workflows.
//!
//! Services turn a raw query string or a submitted form into API calls and
//! page data. They log failures and hand a [`ServiceError`] back to the route,
//! which decides how to surface it.

use crate::api::ListQuery;
use crate::dto::{FormData, ListPageData};
use crate::filters::{self, FilterHelper, FilterValues};
use crate::forms::FieldErrors;
use crate::forms::field::{FieldDescriptor, render_fields};
use crate::pagination::Paginated;
use crate::table::{RenderContext, Row, Table};

pub mod banners;
pub mod broadcasts;
pub mod customers;
pub mod errors;
#[cfg(test)]
pub(crate) mod fake;
pub mod orders;
pub mod product_groups;
pub mod products;
pub mod refunds;
pub mod sellers;
pub mod svd;

pub use errors::{ServiceError, ServiceResult};

/// One list view: where it lives, which filters it knows and its page size.
pub(crate) struct ListView<'a> {
    pub path: &'a str,
    pub helper: FilterHelper,
    pub values: FilterValues,
    pub per_page: usize,
}

impl<'a> ListView<'a> {
    pub fn new(path: &'a str, helper: FilterHelper, query: &str, per_page: usize) -> Self {
        let values = helper.current_values(query);
        Self {
            path,
            helper,
            values,
            per_page,
        }
    }

    /// API query for the current page, sort and filters. `params` maps filter
    /// keys to the parameter names the API expects.
    pub fn api_query(&self, params: &[(&str, &str)]) -> ListQuery {
        let mut query = ListQuery::new().paginate(filters::page(&self.values), self.per_page);
        if let Some((column, descending)) = filters::sort(&self.values) {
            query = query.sort(column, descending);
        }
        for (key, param) in params {
            for value in self.values.get_all(key) {
                query = query.filter(*param, value);
            }
        }
        query
    }

    pub fn page_data(
        &self,
        table: &Table,
        rows: &[Row],
        total: usize,
        filter_fields: &[FieldDescriptor],
    ) -> ListPageData {
        let ctx = RenderContext {
            helper: &self.helper,
            path: self.path,
            values: &self.values,
        };
        let pages = Paginated::new(filters::page(&self.values), total, self.per_page)
            .links(&self.helper, self.path, &self.values);

        ListPageData {
            table: table.render(rows, &ctx),
            pages,
            total,
            filters: self.values.as_map(),
            filter_fields: render_fields(filter_fields, |name| self.values.get(name), &FieldErrors::new()),
            reset_url: self.path.to_string(),
        }
    }
}

/// Builds a form for rendering from descriptors and current values.
pub(crate) fn form_data<'a, F>(
    action: impl Into<String>,
    descriptors: &[FieldDescriptor],
    value_of: F,
    errors: &FieldErrors,
) -> FormData
where
    F: Fn(&str) -> Option<&'a str>,
{
    FormData {
        action: action.into(),
        fields: render_fields(descriptors, value_of, errors),
        errors: errors.general().to_vec(),
    }
}

/// Converts a list of serializable items into table rows.
pub(crate) fn rows_from<T, I, F>(items: &[T], id: F) -> ServiceResult<Vec<Row>>
where
    T: serde::Serialize,
    I: ToString,
    F: Fn(&T) -> I,
{
    items
        .iter()
        .map(|item| {
            Row::from_serialize(id(item), item).map_err(|err| {
                log::error!("Failed to convert item into a table row: {err}");
                ServiceError::Internal(err.to_string())
            })
        })
        .collect()
}
