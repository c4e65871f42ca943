use crate::api::CustomerReader;
use crate::domain::customer::Customer;
use crate::dto::ListPageData;
use crate::filters::FilterHelper;
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::services::{ListView, ServiceResult, rows_from};
use crate::table::{CellKind, Column, Table};

pub const CUSTOMERS_PATH: &str = "/customers";
pub const CUSTOMERS_PER_PAGE: usize = 30;

pub fn customer_filters() -> FilterHelper {
    FilterHelper::new([("q", ""), ("page", ""), ("sort", ""), ("dir", "")])
}

fn customers_table() -> Table {
    Table::new(vec![
        Column::new("name", "Имя", CellKind::String),
        Column::new("email", "Email", CellKind::String),
        Column::new("phone", "Телефон", CellKind::String).unsortable(),
        Column::new("ordersCount", "Заказов", CellKind::Int),
        Column::new("isBlocked", "Заблокирован", CellKind::Binary),
        Column::new("createdAt", "Зарегистрирован", CellKind::Date),
    ])
    .empty_message("Клиенты не найдены")
}

pub async fn load_customers<R>(api: &R, query: &str) -> ServiceResult<ListPageData>
where
    R: CustomerReader + ?Sized,
{
    let view = ListView::new(CUSTOMERS_PATH, customer_filters(), query, CUSTOMERS_PER_PAGE);
    let page = api
        .list_customers(view.api_query(&[("q", "query")]))
        .await
        .map_err(|err| {
            log::error!("Failed to list customers: {err}");
            err
        })?;
    let rows = rows_from(&page.items, |customer: &Customer| customer.id)?;
    let filter_fields = vec![
        FieldDescriptor::new("q", "Поиск", FieldKind::Text).placeholder("Имя, email или телефон"),
    ];
    Ok(view.page_data(&customers_table(), &rows, page.total, &filter_fields))
}
