//! `reqwest` implementation of the API traits.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::envelope::Envelope;
use crate::api::{
    ApiError, ApiErrorKind, ApiResult, BannerReader, BannerWriter, BroadcastReader,
    BroadcastWriter, CustomerReader, ListQuery, OrderReader, Page, ProductGroupReader,
    ProductGroupWriter, ProductReader, RefundReader, SellerReader, SellerWriter, Upload,
};
use crate::domain::banner::{Banner, BannerFile, NewBanner};
use crate::domain::broadcast::{Attachment, Broadcast, NewBroadcast};
use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::domain::product_group::{NewProductGroup, ProductGroup};
use crate::domain::refund::Refund;
use crate::domain::seller::{NewSeller, Seller};
use crate::domain::types::{BannerFileId, BannerId, BroadcastId, OrderId, ProductGroupId};

/// Cheaply clonable REST client shared by all workers.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ApiError::new(ApiErrorKind::BadRequest, format!("Invalid API token: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> ApiResult<String> {
        let mut url = format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'));
        if !query.is_empty() {
            let encoded = serde_html_form::to_string(query).map_err(|e| {
                ApiError::new(ApiErrorKind::BadRequest, format!("Invalid query: {e}"))
            })?;
            url.push('?');
            url.push_str(&encoded);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<Envelope<T>> {
        let url = self.url(path, query)?;
        log::debug!("GET {url}");
        let response = self.inner.client.get(&url).send().await?;
        handle_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Envelope<T>> {
        let url = self.url(path, &[])?;
        log::debug!("{method} {url}");
        let response = self
            .inner
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        log::debug!("DELETE {url}");
        let response = self.inner.client.delete(&url).send().await?;
        handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, file: Upload) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        log::debug!("POST {url} ({} bytes)", file.bytes.len());

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type {
            part = part.mime_str(&content_type)?;
        }
        let form = Form::new().part("file", part);

        let response = self.inner.client.post(&url).multipart(form).send().await?;
        require_data(handle_response(response).await?)
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> ApiResult<Envelope<T>> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    parse_envelope(status, &body)
}

/// Turns a status code and raw body into an envelope or a typed error.
pub(crate) fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<Envelope<T>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.first_error().map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(ApiError::new(ApiErrorKind::from_status(status), message));
    }

    if body.trim().is_empty() {
        return Ok(Envelope {
            data: None,
            meta: None,
            errors: Vec::new(),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::new(ApiErrorKind::Decode, format!("Malformed response: {e}")))?;

    if envelope.data.is_none() {
        if let Some(message) = envelope.first_error() {
            return Err(ApiError::new(ApiErrorKind::Unprocessable, message));
        }
    }

    Ok(envelope)
}

fn require_data<T>(envelope: Envelope<T>) -> ApiResult<T> {
    envelope
        .data
        .ok_or_else(|| ApiError::new(ApiErrorKind::Decode, "Response carried no data"))
}

impl BannerReader for ApiClient {
    async fn list_banners(&self, query: ListQuery) -> ApiResult<Page<Banner>> {
        Ok(self.get::<Vec<Banner>>("cms/banners", &query.to_pairs()).await?.into())
    }

    async fn get_banner(&self, id: BannerId) -> ApiResult<Banner> {
        require_data(self.get(&format!("cms/banners/{id}"), &[]).await?)
    }
}

impl BannerWriter for ApiClient {
    async fn create_banner(&self, banner: &NewBanner) -> ApiResult<Banner> {
        require_data(self.send_json(Method::POST, "cms/banners", banner).await?)
    }

    async fn update_banner(&self, id: BannerId, banner: &NewBanner) -> ApiResult<Banner> {
        require_data(
            self.send_json(Method::PUT, &format!("cms/banners/{id}"), banner)
                .await?,
        )
    }

    async fn delete_banner(&self, id: BannerId) -> ApiResult<()> {
        self.delete(&format!("cms/banners/{id}")).await
    }

    async fn upload_banner_file(&self, id: BannerId, file: Upload) -> ApiResult<BannerFile> {
        self.upload(&format!("cms/banners/{id}:upload-file"), file)
            .await
    }

    async fn delete_banner_file(&self, id: BannerId, file_id: BannerFileId) -> ApiResult<()> {
        self.send_json::<serde_json::Value, _>(
            Method::POST,
            &format!("cms/banners/{id}:delete-file"),
            &json!({ "fileId": file_id }),
        )
        .await?;
        Ok(())
    }
}

impl ProductGroupReader for ApiClient {
    async fn list_product_groups(&self, query: ListQuery) -> ApiResult<Page<ProductGroup>> {
        Ok(self
            .get::<Vec<ProductGroup>>("catalog/product-groups", &query.to_pairs())
            .await?
            .into())
    }

    async fn get_product_group(&self, id: ProductGroupId) -> ApiResult<ProductGroup> {
        require_data(self.get(&format!("catalog/product-groups/{id}"), &[]).await?)
    }
}

impl ProductGroupWriter for ApiClient {
    async fn create_product_group(&self, group: &NewProductGroup) -> ApiResult<ProductGroup> {
        require_data(
            self.send_json(Method::POST, "catalog/product-groups", group)
                .await?,
        )
    }

    async fn update_product_group(
        &self,
        id: ProductGroupId,
        group: &NewProductGroup,
    ) -> ApiResult<ProductGroup> {
        require_data(
            self.send_json(Method::PUT, &format!("catalog/product-groups/{id}"), group)
                .await?,
        )
    }

    async fn delete_product_group(&self, id: ProductGroupId) -> ApiResult<()> {
        self.delete(&format!("catalog/product-groups/{id}")).await
    }
}

impl ProductReader for ApiClient {
    async fn list_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
        Ok(self
            .get::<Vec<Product>>("catalog/products", &query.to_pairs())
            .await?
            .into())
    }

    async fn search_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
        let body: serde_json::Map<String, serde_json::Value> = query
            .to_pairs()
            .into_iter()
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        Ok(self
            .send_json::<Vec<Product>, _>(Method::POST, "catalog/products:search", &body)
            .await?
            .into())
    }
}

impl OrderReader for ApiClient {
    async fn list_orders(&self, query: ListQuery) -> ApiResult<Page<Order>> {
        Ok(self.get::<Vec<Order>>("orders", &query.to_pairs()).await?.into())
    }

    async fn get_order(&self, id: OrderId) -> ApiResult<Order> {
        require_data(self.get(&format!("orders/{id}"), &[]).await?)
    }
}

impl CustomerReader for ApiClient {
    async fn list_customers(&self, query: ListQuery) -> ApiResult<Page<Customer>> {
        Ok(self.get::<Vec<Customer>>("customers", &query.to_pairs()).await?.into())
    }
}

impl RefundReader for ApiClient {
    async fn list_refunds(&self, query: ListQuery) -> ApiResult<Page<Refund>> {
        Ok(self.get::<Vec<Refund>>("refunds", &query.to_pairs()).await?.into())
    }
}

impl SellerReader for ApiClient {
    async fn list_sellers(&self, query: ListQuery) -> ApiResult<Page<Seller>> {
        Ok(self.get::<Vec<Seller>>("sellers", &query.to_pairs()).await?.into())
    }
}

impl SellerWriter for ApiClient {
    async fn create_seller(&self, seller: &NewSeller) -> ApiResult<Seller> {
        require_data(self.send_json(Method::POST, "sellers", seller).await?)
    }
}

impl BroadcastReader for ApiClient {
    async fn list_broadcasts(&self, query: ListQuery) -> ApiResult<Page<Broadcast>> {
        Ok(self
            .get::<Vec<Broadcast>>("communications", &query.to_pairs())
            .await?
            .into())
    }
}

impl BroadcastWriter for ApiClient {
    async fn create_broadcast(&self, broadcast: &NewBroadcast) -> ApiResult<Broadcast> {
        require_data(
            self.send_json(Method::POST, "communications", broadcast)
                .await?,
        )
    }

    async fn upload_broadcast_file(
        &self,
        id: BroadcastId,
        file: Upload,
    ) -> ApiResult<Attachment> {
        self.upload(&format!("communications/{id}:upload-file"), file)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_uses_envelope_message() {
        let result = parse_envelope::<serde_json::Value>(
            409,
            r#"{"data":null,"errors":[{"code":"conflict","message":"Group has products"}]}"#,
        );
        let err = result.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Conflict);
        assert_eq!(err.message, "Group has products");
    }

    #[test]
    fn error_status_without_body_gets_generic_message() {
        let err = parse_envelope::<serde_json::Value>(500, "").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "Request failed with status 500");
    }

    #[test]
    fn empty_success_body_is_accepted() {
        let envelope = parse_envelope::<serde_json::Value>(204, "").unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_envelope::<Vec<u32>>(200, "<html>").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
    }

    #[test]
    fn errors_without_data_are_rejected() {
        let err = parse_envelope::<Vec<u32>>(
            200,
            r#"{"data":null,"errors":[{"message":"Invalid filter"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unprocessable);
    }

    #[test]
    fn urls_join_base_path_and_query() {
        let client =
            ApiClient::new("https://api.example.com/v1/", None, Duration::from_secs(5)).unwrap();
        let url = client
            .url(
                "/catalog/products",
                &[("q".to_string(), "red shoes".to_string())],
            )
            .unwrap();
        assert_eq!(url, "https://api.example.com/v1/catalog/products?q=red+shoes");
    }
}
