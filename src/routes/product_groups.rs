use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::api::{ProductGroupReader, ProductGroupWriter};
use crate::domain::types::ProductGroupId;
use crate::forms::product_groups::ProductGroupForm;
use crate::notifications::store::{ToastStore, success_toast};
use crate::routes::{base_context, fail_and_redirect, redirect, render_template};
use crate::services::ServiceError;
use crate::services::product_groups::{self as product_groups_service, PRODUCT_GROUPS_PATH};

#[derive(Deserialize)]
pub struct OptionsParams {
    #[serde(default)]
    q: String,
}

pub async fn show_product_groups<A: ProductGroupReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match product_groups_service::load_product_groups(api.get_ref(), req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "product_groups");
            context.insert("list", &data.list);
            context.insert("confirm", &data.confirm);
            render_template(&tera, "product_groups/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке групп", "/"),
    }
}

pub async fn product_group_options<A: ProductGroupReader + 'static>(
    params: web::Query<OptionsParams>,
    api: web::Data<A>,
) -> impl Responder {
    match product_groups_service::product_group_options(api.get_ref(), &params.q).await {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(err) => {
            log::error!("Failed to load group options: {err}");
            HttpResponse::BadGateway().finish()
        }
    }
}

pub async fn new_product_group<A: ProductGroupReader + 'static>(
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match product_groups_service::load_product_group_form(api.get_ref(), None).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "product_groups");
            context.insert("group", &data);
            render_template(&tera, "product_groups/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при открытии формы", PRODUCT_GROUPS_PATH),
    }
}

pub async fn edit_product_group<A: ProductGroupReader + 'static>(
    group_id: web::Path<i64>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let group_id = Some(group_id.into_inner());
    match product_groups_service::load_product_group_form(api.get_ref(), group_id).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "product_groups");
            context.insert("group", &data);
            render_template(&tera, "product_groups/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке группы", PRODUCT_GROUPS_PATH),
    }
}

async fn save_product_group<A: ProductGroupWriter>(
    group_id: Option<i64>,
    form: ProductGroupForm,
    api: &A,
    session: &Session,
    toasts: &ToastStore,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match product_groups_service::save_product_group(api, group_id, form.clone()).await {
        Ok(_) => {
            success_toast("Группа сохранена.");
            redirect(PRODUCT_GROUPS_PATH)
        }
        Err(ServiceError::Validation(errors)) => {
            let id = group_id.and_then(|id| ProductGroupId::new(id).ok());
            let data = product_groups_service::product_group_form_page(id, &form, &errors);
            let mut context = base_context(toasts, session, flash_messages, "product_groups");
            context.insert("group", &data);
            render_template(tera, "product_groups/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при сохранении группы", PRODUCT_GROUPS_PATH),
    }
}

pub async fn create_product_group<A: ProductGroupWriter + 'static>(
    web::Form(form): web::Form<ProductGroupForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    save_product_group(
        None,
        form,
        api.get_ref(),
        &session,
        &toasts,
        &flash_messages,
        &tera,
    )
    .await
}

pub async fn update_product_group<A: ProductGroupWriter + 'static>(
    group_id: web::Path<i64>,
    web::Form(form): web::Form<ProductGroupForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let group_id = Some(group_id.into_inner());
    save_product_group(
        group_id,
        form,
        api.get_ref(),
        &session,
        &toasts,
        &flash_messages,
        &tera,
    )
    .await
}

/// Sent by the confirmation popup. Always returns to the list, which closes
/// the popup.
pub async fn delete_product_group<A: ProductGroupWriter + 'static>(
    group_id: web::Path<i64>,
    api: web::Data<A>,
) -> impl Responder {
    match product_groups_service::delete_product_group(api.get_ref(), group_id.into_inner()).await
    {
        Ok(()) => {
            success_toast("Группа удалена.");
            redirect(PRODUCT_GROUPS_PATH)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при удалении группы", PRODUCT_GROUPS_PATH),
    }
}
