use actix_session::Session;
use actix_web::{HttpRequest, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::RefundReader;
use crate::notifications::store::ToastStore;
use crate::routes::{base_context, fail_and_redirect, render_template};
use crate::services::refunds as refunds_service;

pub async fn show_refunds<A: RefundReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match refunds_service::load_refunds(api.get_ref(), req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "refunds");
            context.insert("list", &data);
            render_template(&tera, "refunds/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке возвратов", "/"),
    }
}
