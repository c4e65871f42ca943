use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::svd::SvdEditForm;
use crate::notifications::store::{ToastStore, success_toast};
use crate::routes::{base_context, fail_and_redirect, redirect, render_template};
use crate::services::ServiceError;
use crate::services::svd::{self as svd_service, CONTROLLER_PATH};
use crate::svd::store::SvdStore;

#[get("/controller")]
pub async fn show_controller(
    store: web::Data<SvdStore>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match svd_service::load_controller(&store).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "controller");
            context.insert("controller", &data);
            render_template(&tera, "svd/controller.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке описания контроллера", "/"),
    }
}

/// Renders the page directly so the rebuilt XML can be shown.
#[post("/controller")]
pub async fn save_controller(
    body: web::Bytes,
    store: web::Data<SvdStore>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = match SvdEditForm::parse(&body) {
        Ok(form) => form,
        Err(err) => return fail_and_redirect(&err.into(), "Ошибка в форме", CONTROLLER_PATH),
    };

    match svd_service::save_controller(&store, &form.pairs).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "controller");
            context.insert("controller", &data);
            render_template(&tera, "svd/controller.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при сохранении контроллера", CONTROLLER_PATH),
    }
}

#[post("/controller/reload")]
pub async fn reload_controller(store: web::Data<SvdStore>) -> impl Responder {
    match svd_service::reload_controller(&store).await {
        Ok(()) => {
            success_toast("Описание контроллера загружено заново.");
            redirect(CONTROLLER_PATH)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке описания контроллера", "/"),
    }
}

#[get("/peripherals/{name}")]
pub async fn show_peripheral(
    name: web::Path<String>,
    req: HttpRequest,
    store: web::Data<SvdStore>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match svd_service::load_peripheral(&store, &name, req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "controller");
            context.insert("peripheral", &data);
            render_template(&tera, "svd/peripheral.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке периферии", CONTROLLER_PATH),
    }
}

#[post("/peripherals/{name}")]
pub async fn save_peripheral(
    name: web::Path<String>,
    body: web::Bytes,
    store: web::Data<SvdStore>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let back = format!("{}/{}", svd_service::PERIPHERALS_PATH, name.as_str());
    let form = match SvdEditForm::parse(&body) {
        Ok(form) => form,
        Err(err) => return fail_and_redirect(&err.into(), "Ошибка в форме", &back),
    };

    let data = match svd_service::save_peripheral(&store, &name, &form.pairs).await {
        Ok(data) => data,
        Err(ServiceError::Validation(errors)) => {
            match svd_service::load_peripheral(&store, &name, "").await {
                Ok(mut data) => {
                    svd_service::mark_errors(&mut data.fields, &errors);
                    data
                }
                Err(err) => return fail_and_redirect(&err, "Ошибка при загрузке периферии", &back),
            }
        }
        Err(err) => return fail_and_redirect(&err, "Ошибка при сохранении периферии", &back),
    };

    let mut context = base_context(&toasts, &session, &flash_messages, "controller");
    context.insert("peripheral", &data);
    render_template(&tera, "svd/peripheral.html", &context)
}
