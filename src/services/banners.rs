//! Banner list, editor and image uploads.

use crate::api::{BannerReader, BannerWriter, Upload};
use crate::domain::banner::{Banner, BannerFile, NewBanner};
use crate::domain::types::{BannerFileId, BannerId};
use crate::dto::ListPageData;
use crate::dto::banners::{BannerFormPageData, SavedBanner};
use crate::filters::FilterHelper;
use crate::forms::FieldErrors;
use crate::forms::banners::{BannerForm, banner_fields};
use crate::forms::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::services::{ListView, ServiceError, ServiceResult, form_data, rows_from};
use crate::table::{CellKind, Column, RowAction, RowActionKind, Table};

pub const BANNERS_PATH: &str = "/banners";
pub const BANNERS_PER_PAGE: usize = 20;

pub fn banner_filters() -> FilterHelper {
    FilterHelper::new([
        ("title", ""),
        ("active", ""),
        ("page", ""),
        ("sort", ""),
        ("dir", ""),
    ])
}

fn filter_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("title", "Заголовок", FieldKind::Text).placeholder("Поиск"),
        FieldDescriptor::new(
            "active",
            "Активность",
            FieldKind::Select {
                options: SelectOption::from_labels(&[
                    ("", "Все"),
                    ("true", "Активные"),
                    ("false", "Неактивные"),
                ]),
            },
        ),
    ]
}

fn banners_table() -> Table {
    Table::new(vec![
        Column::new("image", "Изображение", CellKind::Photo).unsortable(),
        Column::new("title", "Заголовок", CellKind::String),
        Column::new("link", "Ссылка", CellKind::Link).unsortable(),
        Column::new("position", "Позиция", CellKind::Int),
        Column::new("isActive", "Активен", CellKind::Binary),
        Column::new("hasBtn", "Кнопка", CellKind::Binary).unsortable(),
        Column::new("createdAt", "Создан", CellKind::Date),
    ])
    .empty_message("Баннеров пока нет")
}

/// Loads one page of banners for the list view.
pub async fn load_banners<R>(api: &R, query: &str) -> ServiceResult<ListPageData>
where
    R: BannerReader + ?Sized,
{
    let view = ListView::new(BANNERS_PATH, banner_filters(), query, BANNERS_PER_PAGE);
    let page = api
        .list_banners(view.api_query(&[("title", "title"), ("active", "isActive")]))
        .await
        .map_err(|err| {
            log::error!("Failed to list banners: {err}");
            err
        })?;

    let rows = rows_from(&page.items, |banner: &Banner| banner.id)?
        .into_iter()
        .zip(&page.items)
        .map(|(mut row, banner)| {
            if let Some(file) = banner.files.first() {
                row.values
                    .insert("image".to_string(), serde_json::Value::String(file.url.clone()));
            }
            let id = banner.id;
            row.with_actions(vec![
                RowAction::new(RowActionKind::Edit, format!("{BANNERS_PATH}/{id}/edit")),
                RowAction::new(RowActionKind::Copy, format!("{BANNERS_PATH}/new?copy={id}")),
                RowAction::new(RowActionKind::Delete, format!("{BANNERS_PATH}/{id}/delete")),
            ])
        })
        .collect::<Vec<_>>();

    Ok(view.page_data(&banners_table(), &rows, page.total, &filter_fields()))
}

/// Renders the banner form with the given values and errors.
pub fn banner_form_page(
    id: Option<BannerId>,
    form: &BannerForm,
    errors: &FieldErrors,
    files: Vec<BannerFile>,
) -> BannerFormPageData {
    let action = match id {
        Some(id) => format!("{BANNERS_PATH}/{id}"),
        None => BANNERS_PATH.to_string(),
    };
    let values = form.values();
    BannerFormPageData {
        id,
        form: form_data(
            action,
            &banner_fields(),
            |name| values.get(name).map(String::as_str),
            errors,
        ),
        files,
    }
}

/// Loads the editor for an existing banner, a copy of one, or a blank form.
pub async fn load_banner_form<R>(
    api: &R,
    id: Option<i64>,
    copy_from: Option<i64>,
) -> ServiceResult<BannerFormPageData>
where
    R: BannerReader + ?Sized,
{
    let source = match id.or(copy_from) {
        Some(source) => {
            let banner = api.get_banner(BannerId::new(source)?).await.map_err(|err| {
                log::error!("Failed to load banner {source}: {err}");
                err
            })?;
            Some(banner)
        }
        None => None,
    };

    let Some(banner) = source else {
        return Ok(banner_form_page(
            None,
            &BannerForm::default(),
            &FieldErrors::new(),
            vec![],
        ));
    };

    let form = BannerForm::from_banner(&banner);
    if id.is_some() {
        Ok(banner_form_page(
            Some(banner.id),
            &form,
            &FieldErrors::new(),
            banner.files,
        ))
    } else {
        Ok(banner_form_page(None, &form, &FieldErrors::new(), vec![]))
    }
}

/// Validates the form, creates or updates the banner and then uploads the
/// images one after another. Uploading stops at the first failure; the banner
/// and the images uploaded so far are kept.
pub async fn save_banner<R>(
    api: &R,
    id: Option<i64>,
    form: BannerForm,
    uploads: Vec<Upload>,
) -> ServiceResult<SavedBanner>
where
    R: BannerWriter + ?Sized,
{
    if let Err(errors) = form.check() {
        log::warn!("Banner form rejected: {errors}");
        return Err(ServiceError::Validation(FieldErrors::from(&errors)));
    }

    let banner = NewBanner::try_from(form)?;

    let saved = match id {
        Some(id) => api.update_banner(BannerId::new(id)?, &banner).await,
        None => api.create_banner(&banner).await,
    }
    .map_err(|err| {
        log::error!("Failed to save banner: {err}");
        err
    })?;
    log::info!("Saved banner {}", saved.id);

    let mut result = SavedBanner {
        id: saved.id,
        uploaded: 0,
        upload_errors: vec![],
    };
    for upload in uploads {
        let file_name = upload.file_name.clone();
        match api.upload_banner_file(saved.id, upload).await {
            Ok(_) => result.uploaded += 1,
            Err(err) => {
                log::error!("Failed to upload {file_name} for banner {}: {err}", saved.id);
                result.upload_errors.push(format!("{file_name}: {}", err.message));
                break;
            }
        }
    }

    Ok(result)
}

pub async fn delete_banner<R>(api: &R, id: i64) -> ServiceResult<()>
where
    R: BannerWriter + ?Sized,
{
    let id = BannerId::new(id)?;
    api.delete_banner(id).await.map_err(|err| {
        log::error!("Failed to delete banner {id}: {err}");
        err
    })?;
    log::info!("Deleted banner {id}");
    Ok(())
}

pub async fn delete_banner_file<R>(api: &R, id: i64, file_id: i64) -> ServiceResult<()>
where
    R: BannerWriter + ?Sized,
{
    let id = BannerId::new(id)?;
    let file_id = BannerFileId::new(file_id)?;
    api.delete_banner_file(id, file_id).await.map_err(|err| {
        log::error!("Failed to delete file {file_id} of banner {id}: {err}");
        err
    })?;
    Ok(())
}
