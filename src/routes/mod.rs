//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::IncomingFlashMessages;
use chrono::Utc;
use tera::{Context, Tera};

use crate::notifications::store::{ToastStore, error_toast};
use crate::services::ServiceError;

pub mod banners;
pub mod broadcasts;
pub mod customers;
pub mod main;
pub mod orders;
pub mod product_groups;
pub mod products;
pub mod refunds;
pub mod sellers;
pub mod svd;

#[cfg(test)]
mod app_tests;

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: the toasts to show and the active menu item.
pub fn base_context(
    toasts: &ToastStore,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
) -> Context {
    let mut context = Context::new();
    context.insert("toasts", &toasts.present(session, flash_messages, Utc::now()));
    context.insert("current_page", current_page);
    context
}

/// User facing text of a failed service call.
pub fn error_message(err: &ServiceError, action: &str) -> String {
    match err {
        ServiceError::NotFound => "Запись не найдена.".to_string(),
        ServiceError::Validation(_) | ServiceError::Form(_) | ServiceError::TypeConstraint(_) => {
            format!("{action}: проверьте введённые данные.")
        }
        ServiceError::Api(api) => format!("{action}: {}", api.message),
        ServiceError::Svd(svd) => format!("{action}: {svd}"),
        ServiceError::Internal(_) => format!("{action}: внутренняя ошибка."),
    }
}

/// Logs the failure, queues an error toast and redirects.
pub fn fail_and_redirect(err: &ServiceError, action: &str, location: &str) -> HttpResponse {
    log::error!("{action}: {err}");
    error_toast(error_message(err, action));
    redirect(location)
}

/// Queues one error toast per failed upload.
pub fn upload_error_toasts(errors: &[String]) {
    for error in errors {
        error_toast(format!("Файл не загружен: {error}"));
    }
}
