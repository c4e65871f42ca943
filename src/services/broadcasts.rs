//! Broadcast list and composer. Attachments are uploaded in parallel once the
//! broadcast exists.

use futures::future::join_all;
use validator::Validate;

use crate::api::{BroadcastReader, BroadcastWriter, Upload};
use crate::domain::broadcast::{Broadcast, NewBroadcast};
use crate::dto::broadcasts::SavedBroadcast;
use crate::dto::{FormData, ListWithFormPageData};
use crate::filters::FilterHelper;
use crate::forms::FieldErrors;
use crate::forms::broadcasts::{BroadcastForm, broadcast_fields};
use crate::services::{ListView, ServiceError, ServiceResult, form_data, rows_from};
use crate::table::{CellKind, Column, Table};

pub const BROADCASTS_PATH: &str = "/broadcasts";
pub const BROADCASTS_PER_PAGE: usize = 20;

pub fn broadcast_filters() -> FilterHelper {
    FilterHelper::new([("page", ""), ("sort", ""), ("dir", "")])
}

fn broadcasts_table() -> Table {
    Table::new(vec![
        Column::new("title", "Тема", CellKind::String),
        Column::new("status", "Статус", CellKind::String),
        Column::new("attachments", "Вложения", CellKind::Array).unsortable(),
        Column::new("createdAt", "Создана", CellKind::Date),
    ])
    .empty_message("Рассылок пока нет")
}

pub fn broadcast_form(form: &BroadcastForm, errors: &FieldErrors) -> FormData {
    let values = form.values();
    form_data(
        BROADCASTS_PATH,
        &broadcast_fields(),
        |name| values.get(name).map(String::as_str),
        errors,
    )
}

pub async fn load_broadcasts<R>(
    api: &R,
    query: &str,
    form: &BroadcastForm,
    errors: &FieldErrors,
) -> ServiceResult<ListWithFormPageData>
where
    R: BroadcastReader + ?Sized,
{
    let view = ListView::new(BROADCASTS_PATH, broadcast_filters(), query, BROADCASTS_PER_PAGE);
    let page = api
        .list_broadcasts(view.api_query(&[]))
        .await
        .map_err(|err| {
            log::error!("Failed to list broadcasts: {err}");
            err
        })?;

    let rows = rows_from(&page.items, |broadcast: &Broadcast| broadcast.id)?
        .into_iter()
        .zip(&page.items)
        .map(|(mut row, broadcast)| {
            let names = broadcast
                .attachments
                .iter()
                .map(|a| serde_json::Value::String(a.name.clone().unwrap_or_else(|| a.url.clone())))
                .collect();
            row.values
                .insert("attachments".to_string(), serde_json::Value::Array(names));
            row
        })
        .collect::<Vec<_>>();

    Ok(ListWithFormPageData {
        list: view.page_data(&broadcasts_table(), &rows, page.total, &[]),
        form: broadcast_form(form, errors),
    })
}

/// Creates the broadcast, then uploads every attachment concurrently. Failed
/// uploads are collected; the broadcast and the other attachments are kept.
pub async fn create_broadcast<R>(
    api: &R,
    form: BroadcastForm,
    uploads: Vec<Upload>,
) -> ServiceResult<SavedBroadcast>
where
    R: BroadcastWriter + ?Sized,
{
    if let Err(errors) = form.validate() {
        return Err(ServiceError::Validation(FieldErrors::from(&errors)));
    }

    let broadcast = NewBroadcast::try_from(form)?;
    let created = api.create_broadcast(&broadcast).await.map_err(|err| {
        log::error!("Failed to create broadcast: {err}");
        err
    })?;
    log::info!("Created broadcast {}", created.id);

    let id = created.id;
    let results = join_all(uploads.into_iter().map(|upload| async move {
        let file_name = upload.file_name.clone();
        (file_name, api.upload_broadcast_file(id, upload).await)
    }))
    .await;

    let mut saved = SavedBroadcast {
        id,
        uploaded: 0,
        upload_errors: vec![],
    };
    for (file_name, result) in results {
        match result {
            Ok(_) => saved.uploaded += 1,
            Err(err) => {
                log::error!("Failed to upload {file_name} for broadcast {id}: {err}");
                saved.upload_errors.push(format!("{file_name}: {}", err.message));
            }
        }
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{FakeApi, upload};

    fn form() -> BroadcastForm {
        BroadcastForm {
            title: "Весенняя распродажа".to_string(),
            text: "Скидки до 50%".to_string(),
        }
    }

    #[actix_web::test]
    async fn every_attachment_is_attempted() {
        let api = FakeApi {
            failing_uploads: vec!["b.pdf".to_string()],
            ..FakeApi::default()
        };

        let saved = create_broadcast(
            &api,
            form(),
            vec![upload("a.pdf"), upload("b.pdf"), upload("c.pdf")],
        )
        .await
        .unwrap();

        assert_eq!(saved.uploaded, 2);
        assert_eq!(saved.upload_errors, vec!["b.pdf: unsupported file".to_string()]);
        let calls = api.calls();
        assert_eq!(calls[0], "create_broadcast(Весенняя распродажа)");
        assert_eq!(calls.len(), 4);
    }

    #[actix_web::test]
    async fn failed_create_skips_uploads() {
        let api = FakeApi {
            fail_mutations: true,
            ..FakeApi::default()
        };

        let result = create_broadcast(&api, form(), vec![upload("a.pdf")]).await;

        assert!(matches!(result, Err(ServiceError::Api(_))));
        assert_eq!(api.calls().len(), 1);
    }

    #[actix_web::test]
    async fn blank_title_is_inline_error() {
        let api = FakeApi::default();
        let form = BroadcastForm {
            title: "  ".to_string(),
            ..form()
        };

        let result = create_broadcast(&api, form, vec![]).await;

        assert!(matches!(result, Err(ServiceError::Validation(errors)) if errors.contains("title")));
        assert!(api.calls().is_empty());
    }
}
