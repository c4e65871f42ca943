use crate::api::RefundReader;
use crate::domain::refund::{Refund, RefundStatus};
use crate::dto::ListPageData;
use crate::filters::FilterHelper;
use crate::forms::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::services::{ListView, ServiceResult, rows_from};
use crate::table::{CellKind, Column, Table};

pub const REFUNDS_PATH: &str = "/refunds";
pub const REFUNDS_PER_PAGE: usize = 20;

pub fn refund_filters() -> FilterHelper {
    FilterHelper::new([("status", ""), ("page", ""), ("sort", ""), ("dir", "")])
}

fn refunds_table() -> Table {
    Table::new(vec![
        Column::new("orderId", "Заказ", CellKind::Int),
        Column::new("amount", "Сумма", CellKind::Price),
        Column::new("reason", "Причина", CellKind::String).unsortable(),
        Column::new(
            "status",
            "Статус",
            CellKind::Status(CellKind::labels(&RefundStatus::LABELS)),
        ),
        Column::new("createdAt", "Создан", CellKind::Date),
    ])
    .empty_message("Возвратов нет")
}

pub async fn load_refunds<R>(api: &R, query: &str) -> ServiceResult<ListPageData>
where
    R: RefundReader + ?Sized,
{
    let view = ListView::new(REFUNDS_PATH, refund_filters(), query, REFUNDS_PER_PAGE);
    let page = api
        .list_refunds(view.api_query(&[("status", "status")]))
        .await
        .map_err(|err| {
            log::error!("Failed to list refunds: {err}");
            err
        })?;
    let rows = rows_from(&page.items, |refund: &Refund| refund.id)?;

    let mut statuses = vec![SelectOption::new("", "Все")];
    statuses.extend(SelectOption::from_labels(&RefundStatus::LABELS));
    let filter_fields = vec![FieldDescriptor::new(
        "status",
        "Статус",
        FieldKind::Select { options: statuses },
    )];

    Ok(view.page_data(&refunds_table(), &rows, page.total, &filter_fields))
}
