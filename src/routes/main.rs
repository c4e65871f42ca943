use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;
use uuid::Uuid;

use crate::notifications::store::ToastStore;
use crate::routes::{base_context, render_template};

/// Sections listed on the dashboard: path and title.
const SECTIONS: [(&str, &str); 9] = [
    ("/banners", "Баннеры"),
    ("/product-groups", "Группы товаров"),
    ("/products", "Товары"),
    ("/orders", "Заказы"),
    ("/customers", "Клиенты"),
    ("/refunds", "Возвраты"),
    ("/sellers", "Продавцы"),
    ("/broadcasts", "Рассылки"),
    ("/controller", "Контроллер"),
];

#[get("/")]
pub async fn show_index(
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&toasts, &session, &flash_messages, "index");
    let sections: Vec<_> = SECTIONS
        .iter()
        .map(|(path, title)| serde_json::json!({ "path": path, "title": title }))
        .collect();
    context.insert("sections", &sections);
    render_template(&tera, "main/index.html", &context)
}

#[post("/toasts/{id}/dismiss")]
pub async fn dismiss_toast(
    id: web::Path<Uuid>,
    session: Session,
    toasts: web::Data<ToastStore>,
) -> impl Responder {
    if toasts.dismiss(&session, id.into_inner()) {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}
