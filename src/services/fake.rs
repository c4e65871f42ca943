//! In-memory API used by service tests that must run without `test-mocks`.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};

use crate::api::{
    ApiError, ApiErrorKind, ApiResult, BannerReader, BannerWriter, BroadcastReader,
    BroadcastWriter, CustomerReader, ListQuery, OrderReader, Page, ProductGroupReader,
    ProductGroupWriter, ProductReader, RefundReader, SellerReader, SellerWriter, Upload,
};
use crate::domain::banner::{Banner, BannerFile, NewBanner};
use crate::domain::broadcast::{Attachment, Broadcast, NewBroadcast};
use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::{Product, ProductStatus};
use crate::domain::product_group::{NewProductGroup, ProductGroup};
use crate::domain::refund::Refund;
use crate::domain::seller::{NewSeller, Seller};
use crate::domain::types::{
    BannerFileId, BannerId, BroadcastId, OrderId, ProductGroupId, ProductId, SellerId,
};

#[derive(Default)]
pub struct FakeApi {
    /// Every call in order, e.g. `delete_product_group(5)`.
    pub calls: RefCell<Vec<String>>,
    /// Queries received by list calls.
    pub queries: RefCell<Vec<ListQuery>>,
    pub banners: Vec<Banner>,
    pub groups: Vec<ProductGroup>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    /// Uploads whose file name is listed here fail.
    pub failing_uploads: Vec<String>,
    /// Mutations fail with a server error.
    pub fail_mutations: bool,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn mutation(&self, call: String) -> ApiResult<()> {
        self.record(call);
        if self.fail_mutations {
            Err(ApiError::new(ApiErrorKind::Server, "backend unavailable"))
        } else {
            Ok(())
        }
    }

    fn upload(&self, call: String, file: &Upload) -> ApiResult<()> {
        self.record(call);
        if self.failing_uploads.contains(&file.file_name) {
            Err(ApiError::new(ApiErrorKind::Unprocessable, "unsupported file"))
        } else {
            Ok(())
        }
    }

    fn list<T: Clone>(&self, query: ListQuery, items: &[T]) -> ApiResult<Page<T>> {
        self.queries.borrow_mut().push(query);
        Ok(Page {
            total: items.len(),
            items: items.to_vec(),
        })
    }
}

pub fn banner(id: i64, title: &str) -> Banner {
    Banner {
        id: BannerId::new(id).unwrap(),
        title: title.to_string(),
        link: None,
        position: Some(1),
        is_active: true,
        has_btn: false,
        btn_text: None,
        files: vec![],
        created_at: None,
    }
}

pub fn group(id: i64, name: &str, children: Vec<ProductGroup>) -> ProductGroup {
    ProductGroup {
        id: ProductGroupId::new(id).unwrap(),
        name: name.to_string(),
        slug: Some(format!("group-{id}")),
        parent_id: None,
        is_active: true,
        products_count: Some(0),
        children,
    }
}

pub fn product(id: i64, name: &str) -> Product {
    Product {
        id: ProductId::new(id).unwrap(),
        name: name.to_string(),
        sku: Some(format!("SKU-{id}")),
        price: Some(1000.0 * id as f64),
        old_price: None,
        status: ProductStatus::Active,
        group_id: None,
        photo: None,
        tags: vec![],
        is_published: true,
        created_at: None,
    }
}

pub fn order(id: i64) -> Order {
    Order {
        id: OrderId::new(id).unwrap(),
        number: format!("A-{id}"),
        status: OrderStatus::New,
        customer: None,
        total: 2500.0,
        items: vec![],
        is_paid: false,
        created_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
    }
}

impl BannerReader for FakeApi {
    async fn list_banners(&self, query: ListQuery) -> ApiResult<Page<Banner>> {
        self.list(query, &self.banners)
    }

    async fn get_banner(&self, id: BannerId) -> ApiResult<Banner> {
        self.banners
            .iter()
            .find(|banner| banner.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(ApiErrorKind::NotFound, "banner not found"))
    }
}

impl BannerWriter for FakeApi {
    async fn create_banner(&self, banner: &NewBanner) -> ApiResult<Banner> {
        self.mutation(format!("create_banner({})", banner.title.as_str()))?;
        Ok(self::banner(10, banner.title.as_str()))
    }

    async fn update_banner(&self, id: BannerId, banner: &NewBanner) -> ApiResult<Banner> {
        self.mutation(format!("update_banner({id})"))?;
        Ok(self::banner(id.get(), banner.title.as_str()))
    }

    async fn delete_banner(&self, id: BannerId) -> ApiResult<()> {
        self.mutation(format!("delete_banner({id})"))
    }

    async fn upload_banner_file(&self, id: BannerId, file: Upload) -> ApiResult<BannerFile> {
        self.upload(format!("upload_banner_file({id}, {})", file.file_name), &file)?;
        Ok(BannerFile {
            id: BannerFileId::new(1).unwrap(),
            url: format!("/files/{}", file.file_name),
            name: Some(file.file_name),
        })
    }

    async fn delete_banner_file(&self, id: BannerId, file_id: BannerFileId) -> ApiResult<()> {
        self.mutation(format!("delete_banner_file({id}, {file_id})"))
    }
}

impl ProductGroupReader for FakeApi {
    async fn list_product_groups(&self, query: ListQuery) -> ApiResult<Page<ProductGroup>> {
        self.list(query, &self.groups)
    }

    async fn get_product_group(&self, id: ProductGroupId) -> ApiResult<ProductGroup> {
        self.groups
            .iter()
            .find(|group| group.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(ApiErrorKind::NotFound, "group not found"))
    }
}

impl ProductGroupWriter for FakeApi {
    async fn create_product_group(&self, group: &NewProductGroup) -> ApiResult<ProductGroup> {
        self.mutation(format!("create_product_group({})", group.slug.as_str()))?;
        Ok(self::group(20, group.name.as_str(), vec![]))
    }

    async fn update_product_group(
        &self,
        id: ProductGroupId,
        group: &NewProductGroup,
    ) -> ApiResult<ProductGroup> {
        self.mutation(format!("update_product_group({id})"))?;
        Ok(self::group(id.get(), group.name.as_str(), vec![]))
    }

    async fn delete_product_group(&self, id: ProductGroupId) -> ApiResult<()> {
        self.mutation(format!("delete_product_group({id})"))
    }
}

impl ProductReader for FakeApi {
    async fn list_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
        self.record("list_products".to_string());
        self.list(query, &self.products)
    }

    async fn search_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
        self.record("search_products".to_string());
        self.list(query, &self.products)
    }
}

impl OrderReader for FakeApi {
    async fn list_orders(&self, query: ListQuery) -> ApiResult<Page<Order>> {
        self.list(query, &self.orders)
    }

    async fn get_order(&self, id: OrderId) -> ApiResult<Order> {
        self.orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(ApiErrorKind::NotFound, "order not found"))
    }
}

impl CustomerReader for FakeApi {
    async fn list_customers(&self, query: ListQuery) -> ApiResult<Page<Customer>> {
        self.list(query, &[])
    }
}

impl RefundReader for FakeApi {
    async fn list_refunds(&self, query: ListQuery) -> ApiResult<Page<Refund>> {
        self.list(query, &[])
    }
}

impl SellerReader for FakeApi {
    async fn list_sellers(&self, query: ListQuery) -> ApiResult<Page<Seller>> {
        self.list(query, &[])
    }
}

impl SellerWriter for FakeApi {
    async fn create_seller(&self, seller: &NewSeller) -> ApiResult<Seller> {
        self.mutation(format!("create_seller({})", seller.email.as_str()))?;
        Ok(Seller {
            id: SellerId::new(3).unwrap(),
            name: seller.name.as_str().to_string(),
            email: seller.email.as_str().to_string(),
            phone: seller.phone.as_ref().map(|p| p.as_str().to_string()),
            is_active: true,
            created_at: None,
        })
    }
}

impl BroadcastReader for FakeApi {
    async fn list_broadcasts(&self, query: ListQuery) -> ApiResult<Page<Broadcast>> {
        self.list(query, &[])
    }
}

impl BroadcastWriter for FakeApi {
    async fn create_broadcast(&self, broadcast: &NewBroadcast) -> ApiResult<Broadcast> {
        self.mutation(format!("create_broadcast({})", broadcast.title.as_str()))?;
        Ok(Broadcast {
            id: BroadcastId::new(4).unwrap(),
            title: broadcast.title.as_str().to_string(),
            text: Some(broadcast.text.as_str().to_string()),
            status: None,
            attachments: vec![],
            created_at: None,
        })
    }

    async fn upload_broadcast_file(&self, id: BroadcastId, file: Upload) -> ApiResult<Attachment> {
        self.upload(format!("upload_broadcast_file({id}, {})", file.file_name), &file)?;
        Ok(Attachment {
            id: 1,
            url: format!("/files/{}", file.file_name),
            name: Some(file.file_name),
        })
    }
}

pub fn upload(name: &str) -> Upload {
    Upload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![1, 2, 3],
    }
}
