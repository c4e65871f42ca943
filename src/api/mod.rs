//! Gateway to the back-office REST API.
//!
//! Every resource is exposed through a reader/writer trait pair so services can
//! be exercised against fakes. [`client::ApiClient`] is the `reqwest`
//! implementation used by the running server.
#![allow(async_fn_in_trait)]

use crate::domain::banner::{Banner, BannerFile, NewBanner};
use crate::domain::broadcast::{Attachment, Broadcast, NewBroadcast};
use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::domain::product_group::{NewProductGroup, ProductGroup};
use crate::domain::refund::Refund;
use crate::domain::seller::{NewSeller, Seller};
use crate::domain::types::{BannerFileId, BannerId, BroadcastId, OrderId, ProductGroupId};

pub mod client;
pub mod envelope;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use envelope::Page;
pub use errors::{ApiError, ApiErrorKind, ApiResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: String,
    pub descending: bool,
}

/// Query sent to list endpoints: pagination, sorting and filter parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub pagination: Option<Pagination>,
    pub sort: Option<Sort>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination {
            page: page.max(1),
            per_page,
        });
        self
    }

    pub fn sort(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.sort = Some(Sort {
            column: column.into(),
            descending,
        });
        self
    }

    /// Adds a filter parameter. Blank values are skipped.
    pub fn filter(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.filters.push((key.into(), value.to_string()));
        }
        self
    }

    /// Returns the value of the first filter with the given key.
    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Flattens the query into `page`, `limit`, `sort`, `order` and the filters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(pagination) = &self.pagination {
            pairs.push(("page".to_string(), pagination.page.to_string()));
            pairs.push(("limit".to_string(), pagination.per_page.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.column.clone()));
            let order = if sort.descending { "desc" } else { "asc" };
            pairs.push(("order".to_string(), order.to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// File content forwarded to an `:upload-file` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub trait BannerReader {
    async fn list_banners(&self, query: ListQuery) -> ApiResult<Page<Banner>>;
    async fn get_banner(&self, id: BannerId) -> ApiResult<Banner>;
}

pub trait BannerWriter {
    async fn create_banner(&self, banner: &NewBanner) -> ApiResult<Banner>;
    async fn update_banner(&self, id: BannerId, banner: &NewBanner) -> ApiResult<Banner>;
    async fn delete_banner(&self, id: BannerId) -> ApiResult<()>;
    async fn upload_banner_file(&self, id: BannerId, file: Upload) -> ApiResult<BannerFile>;
    async fn delete_banner_file(&self, id: BannerId, file_id: BannerFileId) -> ApiResult<()>;
}

pub trait ProductGroupReader {
    async fn list_product_groups(&self, query: ListQuery) -> ApiResult<Page<ProductGroup>>;
    async fn get_product_group(&self, id: ProductGroupId) -> ApiResult<ProductGroup>;
}

pub trait ProductGroupWriter {
    async fn create_product_group(&self, group: &NewProductGroup) -> ApiResult<ProductGroup>;
    async fn update_product_group(
        &self,
        id: ProductGroupId,
        group: &NewProductGroup,
    ) -> ApiResult<ProductGroup>;
    async fn delete_product_group(&self, id: ProductGroupId) -> ApiResult<()>;
}

pub trait ProductReader {
    async fn list_products(&self, query: ListQuery) -> ApiResult<Page<Product>>;
    /// Full-text search through `catalog/products:search`.
    async fn search_products(&self, query: ListQuery) -> ApiResult<Page<Product>>;
}

pub trait OrderReader {
    async fn list_orders(&self, query: ListQuery) -> ApiResult<Page<Order>>;
    async fn get_order(&self, id: OrderId) -> ApiResult<Order>;
}

pub trait CustomerReader {
    async fn list_customers(&self, query: ListQuery) -> ApiResult<Page<Customer>>;
}

pub trait RefundReader {
    async fn list_refunds(&self, query: ListQuery) -> ApiResult<Page<Refund>>;
}

pub trait SellerReader {
    async fn list_sellers(&self, query: ListQuery) -> ApiResult<Page<Seller>>;
}

pub trait SellerWriter {
    async fn create_seller(&self, seller: &NewSeller) -> ApiResult<Seller>;
}

pub trait BroadcastReader {
    async fn list_broadcasts(&self, query: ListQuery) -> ApiResult<Page<Broadcast>>;
}

pub trait BroadcastWriter {
    async fn create_broadcast(&self, broadcast: &NewBroadcast) -> ApiResult<Broadcast>;
    async fn upload_broadcast_file(&self, id: BroadcastId, file: Upload)
    -> ApiResult<Attachment>;
}

/// Everything the admin pages need from the backend. Handlers are generic over
/// it so the router can run against any backend implementation.
pub trait AdminApi:
    BannerReader
    + BannerWriter
    + ProductGroupReader
    + ProductGroupWriter
    + ProductReader
    + OrderReader
    + CustomerReader
    + RefundReader
    + SellerReader
    + SellerWriter
    + BroadcastReader
    + BroadcastWriter
{
}

impl<T> AdminApi for T where
    T: BannerReader
        + BannerWriter
        + ProductGroupReader
        + ProductGroupWriter
        + ProductReader
        + OrderReader
        + CustomerReader
        + RefundReader
        + SellerReader
        + SellerWriter
        + BroadcastReader
        + BroadcastWriter
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_flattens_in_order() {
        let query = ListQuery::new()
            .paginate(3, 20)
            .sort("price", true)
            .filter("status", "active")
            .filter("q", "   ");

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "3".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("sort".to_string(), "price".to_string()),
                ("order".to_string(), "desc".to_string()),
                ("status".to_string(), "active".to_string()),
            ]
        );
        assert_eq!(query.filter_value("status"), Some("active"));
        assert_eq!(query.filter_value("q"), None);
    }

    #[test]
    fn page_zero_is_clamped() {
        let query = ListQuery::new().paginate(0, 10);
        assert_eq!(query.pagination.map(|p| p.page), Some(1));
    }
}
