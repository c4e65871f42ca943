use actix_cors::Cors;
use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::api::AdminApi;
use crate::api::client::ApiClient;
use crate::models::config::ServerConfig;
use crate::notifications::store::ToastStore;
use crate::routes::banners::{
    create_banner, delete_banner, delete_banner_file, edit_banner, new_banner, show_banners,
    update_banner,
};
use crate::routes::broadcasts::{create_broadcast, show_broadcasts};
use crate::routes::customers::show_customers;
use crate::routes::main::{dismiss_toast, show_index};
use crate::routes::orders::{show_order, show_orders};
use crate::routes::product_groups::{
    create_product_group, delete_product_group, edit_product_group, new_product_group,
    product_group_options, show_product_groups, update_product_group,
};
use crate::routes::products::{export_products, show_products};
use crate::routes::refunds::show_refunds;
use crate::routes::sellers::{create_seller, show_sellers};
use crate::routes::svd::{
    reload_controller, save_controller, save_peripheral, show_controller, show_peripheral,
};
use crate::svd::store::SvdStore;

pub mod api;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod filters;
pub mod forms;
pub mod models;
pub mod notifications;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod svd;
pub mod table;

/// Registers every page and form handler on `cfg`, backed by the API `A`.
pub fn configure<A: AdminApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(show_index)
        .service(dismiss_toast)
        .route("/banners", web::get().to(show_banners::<A>))
        .route("/banners", web::post().to(create_banner::<A>))
        .route("/banners/new", web::get().to(new_banner::<A>))
        .route("/banners/{banner_id}/edit", web::get().to(edit_banner::<A>))
        .route("/banners/{banner_id}", web::post().to(update_banner::<A>))
        .route("/banners/{banner_id}/delete", web::post().to(delete_banner::<A>))
        .route(
            "/banners/{banner_id}/files/{file_id}/delete",
            web::post().to(delete_banner_file::<A>),
        )
        .route("/product-groups", web::get().to(show_product_groups::<A>))
        .route("/product-groups", web::post().to(create_product_group::<A>))
        .route("/product-groups/options", web::get().to(product_group_options::<A>))
        .route("/product-groups/new", web::get().to(new_product_group::<A>))
        .route("/product-groups/{group_id}/edit", web::get().to(edit_product_group::<A>))
        .route("/product-groups/{group_id}", web::post().to(update_product_group::<A>))
        .route("/product-groups/{group_id}/delete", web::post().to(delete_product_group::<A>))
        .route("/products", web::get().to(show_products::<A>))
        .route("/products/export", web::post().to(export_products::<A>))
        .route("/orders", web::get().to(show_orders::<A>))
        .route("/orders/{order_id}", web::get().to(show_order::<A>))
        .route("/customers", web::get().to(show_customers::<A>))
        .route("/refunds", web::get().to(show_refunds::<A>))
        .route("/sellers", web::get().to(show_sellers::<A>))
        .route("/sellers", web::post().to(create_seller::<A>))
        .route("/broadcasts", web::get().to(show_broadcasts::<A>))
        .route("/broadcasts", web::post().to(create_broadcast::<A>))
        .service(show_controller)
        .service(save_controller)
        .service(reload_controller)
        .service(show_peripheral)
        .service(save_peripheral);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let api = ApiClient::new(
        &server_config.api_base_url,
        server_config.api_token.as_deref(),
        server_config.request_timeout(),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
    let api = web::Data::new(api);

    // The SVD document is fetched lazily on the first editor request.
    let svd_store = SvdStore::new(&server_config.svd_url, server_config.request_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build SVD client: {e}")))?;
    let svd_store = web::Data::new(svd_store);
    let toast_store = web::Data::new(ToastStore::default());

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure::<ApiClient>)
            .app_data(web::Data::new(tera.clone()))
            .app_data(api.clone())
            .app_data(svd_store.clone())
            .app_data(toast_store.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
