use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::ProductReader;
use crate::notifications::store::ToastStore;
use crate::routes::{base_context, fail_and_redirect, render_template};
use crate::services::products::{self as products_service, PRODUCTS_PATH};

pub async fn show_products<A: ProductReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_products(api.get_ref(), req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "products");
            context.insert("list", &data);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке товаров", "/"),
    }
}

/// Filters and `selected` ids may come from the query string (row action) or
/// from the posted bulk form; both are combined.
pub async fn export_products<A: ProductReader + 'static>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<A>,
) -> impl Responder {
    let body = String::from_utf8_lossy(&body);
    let query = [req.query_string(), body.as_ref()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("&");

    match products_service::export_products(api.get_ref(), &query).await {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ))
            .body(csv),
        Err(err) => fail_and_redirect(&err, "Ошибка при выгрузке товаров", PRODUCTS_PATH),
    }
}
