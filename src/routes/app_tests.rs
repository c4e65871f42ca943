//! Router tests against the in-memory API.

use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::configure;
use crate::notifications::store::ToastStore;
use crate::services::fake::{FakeApi, banner, group, product};
use crate::svd::store::SvdStore;

const BOUNDARY: &str = "banner-form-boundary";
/// Nothing listens on port 1.
const SVD_URL: &str = "http://127.0.0.1:1/device.svd";

macro_rules! init_app {
    ($api:expr) => {{
        let key = Key::generate();
        let message_store = CookieMessageStore::builder(key.clone()).build();
        let tera = Tera::new("templates/**/*").unwrap();
        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(message_store).build())
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
                .configure(configure::<FakeApi>)
                .app_data(web::Data::new(tera))
                .app_data($api.clone())
                .app_data(web::Data::new(
                    SvdStore::new(SVD_URL, Duration::from_secs(1)).unwrap(),
                ))
                .app_data(web::Data::new(ToastStore::default())),
        )
        .await
    }};
}

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn multipart(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn banner_post(uri: &str, fields: &[(&str, &str)]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart(fields))
}

#[actix_web::test]
async fn banner_list_renders_backend_rows() {
    let api = web::Data::new(FakeApi {
        banners: vec![banner(1, "Весенняя распродажа"), banner(2, "Новинки")],
        ..FakeApi::default()
    });
    let app = init_app!(api);

    let req = test::TestRequest::get().uri("/banners").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Весенняя распродажа"));
    assert!(body.contains("Новинки"));
}

#[actix_web::test]
async fn group_delete_issues_one_delete_and_returns_to_list() {
    let api = web::Data::new(FakeApi {
        groups: vec![group(7, "Обувь", vec![])],
        ..FakeApi::default()
    });
    let app = init_app!(api);

    let req = test::TestRequest::post()
        .uri("/product-groups/7/delete")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/product-groups");
    assert_eq!(api.calls(), vec!["delete_product_group(7)".to_string()]);
}

#[actix_web::test]
async fn banner_without_button_text_is_shown_again() {
    let api = web::Data::new(FakeApi::default());
    let app = init_app!(api);

    let req = banner_post(
        "/banners",
        &[("title", "Весна"), ("has_btn", "on"), ("btn_text", "")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Обязательное поле"));
    assert!(body.contains("Весна"));
    assert!(api.calls().is_empty());
}

#[actix_web::test]
async fn saved_banner_opens_its_editor() {
    let api = web::Data::new(FakeApi::default());
    let app = init_app!(api);

    let req = banner_post("/banners", &[("title", "Весна"), ("position", "3")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/banners/10/edit");
    assert_eq!(api.calls(), vec!["create_banner(Весна)".to_string()]);
}

#[actix_web::test]
async fn failed_banner_update_returns_to_editor() {
    let api = web::Data::new(FakeApi {
        fail_mutations: true,
        ..FakeApi::default()
    });
    let app = init_app!(api);

    let req = banner_post("/banners/4", &[("title", "Весна")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/banners/4/edit");
    assert_eq!(api.calls(), vec!["update_banner(4)".to_string()]);
}

#[actix_web::test]
async fn row_export_downloads_selected_product() {
    let api = web::Data::new(FakeApi {
        products: vec![product(1, "Кеды"), product(2, "Ботинки")],
        ..FakeApi::default()
    });
    let app = init_app!(api);

    let req = test::TestRequest::post()
        .uri("/products/export?selected=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Ботинки"));
    assert!(!body.contains("Кеды"));
}
