use actix_session::Session;
use actix_web::{HttpRequest, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::OrderReader;
use crate::notifications::store::ToastStore;
use crate::routes::{base_context, fail_and_redirect, render_template};
use crate::services::orders::{self as orders_service, ORDERS_PATH};

pub async fn show_orders<A: OrderReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::load_orders(api.get_ref(), req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "orders");
            context.insert("list", &data);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке заказов", "/"),
    }
}

pub async fn show_order<A: OrderReader + 'static>(
    order_id: web::Path<i64>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::load_order(api.get_ref(), order_id.into_inner()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "orders");
            context.insert("order", &data);
            render_template(&tera, "orders/show.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке заказа", ORDERS_PATH),
    }
}
