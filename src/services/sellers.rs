//! Seller list and registration.

use validator::Validate;

use crate::api::{SellerReader, SellerWriter};
use crate::domain::seller::{NewSeller, Seller};
use crate::dto::{FormData, ListWithFormPageData};
use crate::filters::FilterHelper;
use crate::forms::FieldErrors;
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::sellers::{SellerForm, seller_fields};
use crate::services::{ListView, ServiceError, ServiceResult, form_data, rows_from};
use crate::table::{CellKind, Column, Table};

pub const SELLERS_PATH: &str = "/sellers";
pub const SELLERS_PER_PAGE: usize = 20;

pub fn seller_filters() -> FilterHelper {
    FilterHelper::new([("q", ""), ("page", ""), ("sort", ""), ("dir", "")])
}

fn sellers_table() -> Table {
    Table::new(vec![
        Column::new("name", "Название", CellKind::String),
        Column::new("email", "Email", CellKind::String),
        Column::new("phone", "Телефон", CellKind::String).unsortable(),
        Column::new("isActive", "Активен", CellKind::Binary),
        Column::new("createdAt", "Создан", CellKind::Date),
    ])
    .empty_message("Продавцов пока нет")
}

pub fn seller_form(form: &SellerForm, errors: &FieldErrors) -> FormData {
    let values = form.values();
    form_data(
        SELLERS_PATH,
        &seller_fields(),
        |name| values.get(name).map(String::as_str),
        errors,
    )
}

/// Loads the seller list together with the registration form.
pub async fn load_sellers<R>(
    api: &R,
    query: &str,
    form: &SellerForm,
    errors: &FieldErrors,
) -> ServiceResult<ListWithFormPageData>
where
    R: SellerReader + ?Sized,
{
    let view = ListView::new(SELLERS_PATH, seller_filters(), query, SELLERS_PER_PAGE);
    let page = api
        .list_sellers(view.api_query(&[("q", "query")]))
        .await
        .map_err(|err| {
            log::error!("Failed to list sellers: {err}");
            err
        })?;
    let rows = rows_from(&page.items, |seller: &Seller| seller.id)?;
    let filter_fields = vec![
        FieldDescriptor::new("q", "Поиск", FieldKind::Text).placeholder("Название или email"),
    ];

    Ok(ListWithFormPageData {
        list: view.page_data(&sellers_table(), &rows, page.total, &filter_fields),
        form: seller_form(form, errors),
    })
}

pub async fn create_seller<R>(api: &R, form: SellerForm) -> ServiceResult<Seller>
where
    R: SellerWriter + ?Sized,
{
    if let Err(errors) = form.validate() {
        return Err(ServiceError::Validation(FieldErrors::from(&errors)));
    }

    let seller = NewSeller::try_from(form)?;
    let created = api.create_seller(&seller).await.map_err(|err| {
        log::error!("Failed to create seller {}: {err}", seller.email.as_str());
        err
    })?;
    log::info!("Created seller {}", created.id);
    Ok(created)
}
