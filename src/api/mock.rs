//! Mock API implementation for isolating services in tests.

use mockall::mock;

use crate::api::{
    ApiResult, BannerReader, BannerWriter, BroadcastReader, BroadcastWriter, CustomerReader,
    ListQuery, OrderReader, Page, ProductGroupReader, ProductGroupWriter, ProductReader,
    RefundReader, SellerReader, SellerWriter, Upload,
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

mock! {
    pub Api {}

    impl BannerReader for Api {
        async fn list_banners(&self, query: ListQuery) -> ApiResult<Page<Banner>>;
        async fn get_banner(&self, id: BannerId) -> ApiResult<Banner>;
    }

    impl BannerWriter for Api {
        async fn create_banner(&self, banner: &NewBanner) -> ApiResult<Banner>;
        async fn update_banner(&self, id: BannerId, banner: &NewBanner) -> ApiResult<Banner>;
        async fn delete_banner(&self, id: BannerId) -> ApiResult<()>;
        async fn upload_banner_file(&self, id: BannerId, file: Upload) -> ApiResult<BannerFile>;
        async fn delete_banner_file(&self, id: BannerId, file_id: BannerFileId) -> ApiResult<()>;
    }

    impl ProductGroupReader for Api {
        async fn list_product_groups(&self, query: ListQuery) -> ApiResult<Page<ProductGroup>>;
        async fn get_product_group(&self, id: ProductGroupId) -> ApiResult<ProductGroup>;
    }

    impl ProductGroupWriter for Api {
        async fn create_product_group(&self, group: &NewProductGroup) -> ApiResult<ProductGroup>;
        async fn update_product_group(
            &self,
            id: ProductGroupId,
            group: &NewProductGroup,
        ) -> ApiResult<ProductGroup>;
        async fn delete_product_group(&self, id: ProductGroupId) -> ApiResult<()>;
    }

    impl ProductReader for Api {
        async fn list_products(&self, query: ListQuery) -> ApiResult<Page<Product>>;
        async fn search_products(&self, query: ListQuery) -> ApiResult<Page<Product>>;
    }

    impl OrderReader for Api {
        async fn list_orders(&self, query: ListQuery) -> ApiResult<Page<Order>>;
        async fn get_order(&self, id: OrderId) -> ApiResult<Order>;
    }

    impl CustomerReader for Api {
        async fn list_customers(&self, query: ListQuery) -> ApiResult<Page<Customer>>;
    }

    impl RefundReader for Api {
        async fn list_refunds(&self, query: ListQuery) -> ApiResult<Page<Refund>>;
    }

    impl SellerReader for Api {
        async fn list_sellers(&self, query: ListQuery) -> ApiResult<Page<Seller>>;
    }

    impl SellerWriter for Api {
        async fn create_seller(&self, seller: &NewSeller) -> ApiResult<Seller>;
    }

    impl BroadcastReader for Api {
        async fn list_broadcasts(&self, query: ListQuery) -> ApiResult<Page<Broadcast>>;
    }

    impl BroadcastWriter for Api {
        async fn create_broadcast(&self, broadcast: &NewBroadcast) -> ApiResult<Broadcast>;
        async fn upload_broadcast_file(
            &self,
            id: BroadcastId,
            file: Upload,
        ) -> ApiResult<Attachment>;
    }
}
