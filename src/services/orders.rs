//! Order list and order details.

use crate::api::OrderReader;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::types::OrderId;
use crate::dto::ListPageData;
use crate::dto::orders::OrderPageData;
use crate::filters::{FilterHelper, FilterValues};
use crate::forms::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::services::{ListView, ServiceError, ServiceResult, rows_from};
use crate::table::cell::format_price;
use crate::table::{CellKind, Column, RenderContext, Row, RowAction, RowActionKind, Table};

pub const ORDERS_PATH: &str = "/orders";
pub const ORDERS_PER_PAGE: usize = 20;

pub fn order_filters() -> FilterHelper {
    FilterHelper::new([
        ("q", ""),
        ("status", ""),
        ("date_from", ""),
        ("date_to", ""),
        ("page", ""),
        ("sort", ""),
        ("dir", ""),
    ])
}

fn filter_fields() -> Vec<FieldDescriptor> {
    let mut statuses = vec![SelectOption::new("", "Все")];
    statuses.extend(SelectOption::from_labels(&OrderStatus::LABELS));

    vec![
        FieldDescriptor::new("q", "Поиск", FieldKind::Text).placeholder("Номер или клиент"),
        FieldDescriptor::new("status", "Статус", FieldKind::Select { options: statuses }),
        FieldDescriptor::new("date_from", "С", FieldKind::Calendar),
        FieldDescriptor::new("date_to", "По", FieldKind::Calendar),
    ]
}

fn orders_table() -> Table {
    Table::new(vec![
        Column::new("number", "Номер", CellKind::String),
        Column::new("customer.name", "Клиент", CellKind::String).unsortable(),
        Column::new(
            "status",
            "Статус",
            CellKind::Status(CellKind::labels(&OrderStatus::LABELS)),
        ),
        Column::new("total", "Сумма", CellKind::Price),
        Column::new("isPaid", "Оплачен", CellKind::Binary),
        Column::new("createdAt", "Создан", CellKind::Date),
    ])
    .empty_message("Заказов нет")
}

fn items_table() -> Table {
    Table::new(vec![
        Column::new("name", "Товар", CellKind::String).unsortable(),
        Column::new("quantity", "Количество", CellKind::Int).unsortable(),
        Column::new("price", "Цена", CellKind::Price).unsortable(),
    ])
    .empty_message("В заказе нет позиций")
}

pub async fn load_orders<R>(api: &R, query: &str) -> ServiceResult<ListPageData>
where
    R: OrderReader + ?Sized,
{
    let view = ListView::new(ORDERS_PATH, order_filters(), query, ORDERS_PER_PAGE);
    let page = api
        .list_orders(view.api_query(&[
            ("q", "query"),
            ("status", "status"),
            ("date_from", "dateFrom"),
            ("date_to", "dateTo"),
        ]))
        .await
        .map_err(|err| {
            log::error!("Failed to list orders: {err}");
            err
        })?;

    let rows = rows_from(&page.items, |order: &Order| order.id)?
        .into_iter()
        .map(|row| {
            let href = format!("{ORDERS_PATH}/{}", row.id);
            row.with_actions(vec![RowAction::new(RowActionKind::Edit, href)])
        })
        .collect::<Vec<_>>();

    Ok(view.page_data(&orders_table(), &rows, page.total, &filter_fields()))
}

pub async fn load_order<R>(api: &R, id: i64) -> ServiceResult<OrderPageData>
where
    R: OrderReader + ?Sized,
{
    let id = OrderId::new(id)?;
    let order = api.get_order(id).await.map_err(|err| {
        log::error!("Failed to load order {id}: {err}");
        err
    })?;

    let items = order
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Row::from_serialize(index + 1, item)
                .map_err(|err| ServiceError::Internal(err.to_string()))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let helper = FilterHelper::new(Vec::<(String, String)>::new());
    let values = FilterValues::new();
    let path = format!("{ORDERS_PATH}/{id}");
    let ctx = RenderContext {
        helper: &helper,
        path: &path,
        values: &values,
    };

    let status_label = OrderStatus::LABELS
        .iter()
        .find(|(raw, _)| *raw == order.status.as_str())
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| order.status.as_str().to_string());

    Ok(OrderPageData {
        status_label,
        total: format_price(order.total),
        created_at: order.created_at.format("%d.%m.%Y %H:%M").to_string(),
        items: items_table().render(&items, &ctx),
        order,
    })
}
