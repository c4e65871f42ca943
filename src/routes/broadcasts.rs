use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpRequest, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::{BroadcastReader, BroadcastWriter};
use crate::forms::FieldErrors;
use crate::forms::broadcasts::{BroadcastForm, BroadcastMultipartForm};
use crate::notifications::store::{ToastStore, success_toast};
use crate::routes::{
    base_context, fail_and_redirect, redirect, render_template, upload_error_toasts,
};
use crate::services::ServiceError;
use crate::services::broadcasts::{self as broadcasts_service, BROADCASTS_PATH};

pub async fn show_broadcasts<A: BroadcastReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = BroadcastForm::default();
    match broadcasts_service::load_broadcasts(
        api.get_ref(),
        req.query_string(),
        &form,
        &FieldErrors::new(),
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "broadcasts");
            context.insert("list", &data.list);
            context.insert("form", &data.form);
            render_template(&tera, "broadcasts/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке рассылок", "/"),
    }
}

pub async fn create_broadcast<A: BroadcastReader + BroadcastWriter + 'static>(
    MultipartForm(form): MultipartForm<BroadcastMultipartForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (form, uploads) = match form.into_parts() {
        Ok(parts) => parts,
        Err(err) => {
            return fail_and_redirect(&err.into(), "Ошибка при чтении вложений", BROADCASTS_PATH);
        }
    };

    let errors =
        match broadcasts_service::create_broadcast(api.get_ref(), form.clone(), uploads).await {
            Ok(saved) => {
                success_toast("Рассылка создана.");
                upload_error_toasts(&saved.upload_errors);
                return redirect(BROADCASTS_PATH);
            }
            Err(ServiceError::Validation(errors)) => errors,
            Err(err) => {
                return fail_and_redirect(&err, "Ошибка при создании рассылки", BROADCASTS_PATH);
            }
        };

    match broadcasts_service::load_broadcasts(api.get_ref(), "", &form, &errors).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "broadcasts");
            context.insert("list", &data.list);
            context.insert("form", &data.form);
            render_template(&tera, "broadcasts/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке рассылок", "/"),
    }
}
