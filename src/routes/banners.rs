use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpRequest, Responder, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::api::{BannerReader, BannerWriter};
use crate::domain::types::BannerId;
use crate::forms::banners::BannerMultipartForm;
use crate::notifications::store::{ToastStore, success_toast};
use crate::routes::{
    base_context, fail_and_redirect, redirect, render_template, upload_error_toasts,
};
use crate::services::ServiceError;
use crate::services::banners::{self as banners_service, BANNERS_PATH};

#[derive(Deserialize)]
pub struct NewBannerParams {
    copy: Option<i64>,
}

pub async fn show_banners<A: BannerReader + 'static>(
    req: HttpRequest,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match banners_service::load_banners(api.get_ref(), req.query_string()).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "banners");
            context.insert("list", &data);
            render_template(&tera, "banners/index.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке баннеров", "/"),
    }
}

pub async fn new_banner<A: BannerReader + 'static>(
    params: web::Query<NewBannerParams>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match banners_service::load_banner_form(api.get_ref(), None, params.copy).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "banners");
            context.insert("banner", &data);
            render_template(&tera, "banners/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при копировании баннера", BANNERS_PATH),
    }
}

pub async fn edit_banner<A: BannerReader + 'static>(
    banner_id: web::Path<i64>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let banner_id = banner_id.into_inner();
    match banners_service::load_banner_form(api.get_ref(), Some(banner_id), None).await {
        Ok(data) => {
            let mut context = base_context(&toasts, &session, &flash_messages, "banners");
            context.insert("banner", &data);
            render_template(&tera, "banners/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при загрузке баннера", BANNERS_PATH),
    }
}

async fn save_banner<A: BannerWriter>(
    banner_id: Option<i64>,
    form: BannerMultipartForm,
    api: &A,
    session: &Session,
    toasts: &ToastStore,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> actix_web::HttpResponse {
    let back = match banner_id {
        Some(id) => format!("{BANNERS_PATH}/{id}/edit"),
        None => format!("{BANNERS_PATH}/new"),
    };
    let (form, uploads) = match form.into_parts() {
        Ok(parts) => parts,
        Err(err) => return fail_and_redirect(&err.into(), "Ошибка при чтении файлов", &back),
    };

    match banners_service::save_banner(api, banner_id, form.clone(), uploads).await {
        Ok(saved) => {
            success_toast("Баннер сохранён.");
            upload_error_toasts(&saved.upload_errors);
            redirect(&format!("{BANNERS_PATH}/{}/edit", saved.id))
        }
        Err(ServiceError::Validation(errors)) => {
            let id = banner_id.and_then(|id| BannerId::new(id).ok());
            let data = banners_service::banner_form_page(id, &form, &errors, vec![]);
            let mut context = base_context(toasts, session, flash_messages, "banners");
            context.insert("banner", &data);
            render_template(tera, "banners/form.html", &context)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при сохранении баннера", &back),
    }
}

pub async fn create_banner<A: BannerWriter + 'static>(
    MultipartForm(form): MultipartForm<BannerMultipartForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    save_banner(
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

pub async fn update_banner<A: BannerWriter + 'static>(
    banner_id: web::Path<i64>,
    MultipartForm(form): MultipartForm<BannerMultipartForm>,
    api: web::Data<A>,
    session: Session,
    toasts: web::Data<ToastStore>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let banner_id = Some(banner_id.into_inner());
    save_banner(
        banner_id,
        form,
        api.get_ref(),
        &session,
        &toasts,
        &flash_messages,
        &tera,
    )
    .await
}

pub async fn delete_banner<A: BannerWriter + 'static>(
    banner_id: web::Path<i64>,
    api: web::Data<A>,
) -> impl Responder {
    match banners_service::delete_banner(api.get_ref(), banner_id.into_inner()).await {
        Ok(()) => {
            success_toast("Баннер удалён.");
            redirect(BANNERS_PATH)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при удалении баннера", BANNERS_PATH),
    }
}

pub async fn delete_banner_file<A: BannerWriter + 'static>(
    path: web::Path<(i64, i64)>,
    api: web::Data<A>,
) -> impl Responder {
    let (banner_id, file_id) = path.into_inner();
    let back = format!("{BANNERS_PATH}/{banner_id}/edit");
    match banners_service::delete_banner_file(api.get_ref(), banner_id, file_id).await {
        Ok(()) => {
            success_toast("Изображение удалено.");
            redirect(&back)
        }
        Err(err) => fail_and_redirect(&err, "Ошибка при удалении изображения", &back),
    }
}
