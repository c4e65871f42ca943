use actix_session::Session;
use actix_web::{HttpRequest, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::{SellerReader, SellerWriter};
use crate::forms::FieldErrors;
use crate::forms::sellers::SellerForm;
use crate::notifications::store::{ToastStore, success_toast};
use crate::routes::{base_context, fail_and_redirect, redirect, render_template};
use crate::services::ServiceError;
use crate::services::sellers::{self as sellers_service, SELLERS_PATH};

pub async fn show_sellers<A: SellerReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = SellerForm::default();
    match sellers_service::load_sellers(api.get_ref(), req.query_string(), &form, &FieldErrors::new())
        .await
    {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "sellers");
            context.insert("list", &data.list);
            context.insert("form", &data.form);
            render_template(&tera, "sellers/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке продавцов", "/"),
    }
}

pub async fn create_seller<A: SellerReader + SellerWriter + 'static>(
    web::Form(form): web::Form<SellerForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let errors = match sellers_service::create_seller(api.get_ref(), form.clone()).await {
        Ok(_) => {
            success_toast("Продавец зарегистрирован.");
            return redirect(SELLERS_PATH);
        }
        Err(ServiceError::Validation(errors)) => errors,
        Err(err) => return fail_and_redirect(&err, "Ошибка при регистрации продавца", SELLERS_PATH),
    };

    match sellers_service::load_sellers(api.get_ref(), "", &form, &errors).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "sellers");
            context.insert("list", &data.list);
            context.insert("form", &data.form);
            render_template(&tera, "sellers/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке продавцов", "/"),
    }
}
