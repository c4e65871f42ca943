//! Product catalog list, full-text search and CSV export.

use std::collections::BTreeSet;

use crate::api::{Page, ProductReader};
use crate::domain::product::{Product, ProductStatus};
use crate::dto::ListPageData;
use crate::filters::{FilterHelper, FilterValues};
use crate::forms::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::forms::product_groups::PARENT_OPTIONS_URL;
use crate::services::{ListView, ServiceResult, rows_from};
use crate::table::{
    CellKind, Column, Row, RowAction, RowActionKind, SELECTED_PARAM, Table, rows_to_csv,
    selected_rows,
};

pub const PRODUCTS_PATH: &str = "/products";
pub const PRODUCTS_PER_PAGE: usize = 25;
/// Upper bound of rows fetched for one export.
pub const EXPORT_LIMIT: usize = 1000;

const FILTER_PARAMS: [(&str, &str); 4] = [
    ("status", "status"),
    ("group_id", "groupId"),
    ("price_from", "priceFrom"),
    ("price_to", "priceTo"),
];

pub fn product_filters() -> FilterHelper {
    FilterHelper::new([
        ("q", ""),
        ("status", ""),
        ("group_id", ""),
        ("price_from", ""),
        ("price_to", ""),
        ("page", ""),
        ("sort", ""),
        ("dir", ""),
        (SELECTED_PARAM, ""),
    ])
}

fn filter_fields() -> Vec<FieldDescriptor> {
    let mut statuses = vec![SelectOption::new("", "Все")];
    statuses.extend(SelectOption::from_labels(&ProductStatus::LABELS));

    vec![
        FieldDescriptor::new("q", "Поиск", FieldKind::Text).placeholder("Название или артикул"),
        FieldDescriptor::new("status", "Статус", FieldKind::Select { options: statuses }),
        FieldDescriptor::new(
            "group_id",
            "Группа",
            FieldKind::Autocomplete {
                source: PARENT_OPTIONS_URL.to_string(),
            },
        ),
        FieldDescriptor::new("price_from", "Цена от", FieldKind::Number),
        FieldDescriptor::new("price_to", "Цена до", FieldKind::Number),
    ]
}

fn products_table() -> Table {
    Table::new(vec![
        Column::new("photo", "Фото", CellKind::Photo).unsortable(),
        Column::new("name", "Название", CellKind::String),
        Column::new("sku", "Артикул", CellKind::String),
        Column::new("price", "Цена", CellKind::Price),
        Column::new(
            "status",
            "Статус",
            CellKind::Status(CellKind::labels(&ProductStatus::LABELS)),
        ),
        Column::new("tags", "Теги", CellKind::Array).unsortable(),
        Column::new("isPublished", "Опубликован", CellKind::Binary),
        Column::new("createdAt", "Создан", CellKind::Date),
    ])
    .selectable()
    .empty_message("Товары не найдены")
}

/// Lists or searches products depending on whether `q` is set.
async fn fetch<R>(api: &R, view: &ListView<'_>) -> ServiceResult<Page<Product>>
where
    R: ProductReader + ?Sized,
{
    let mut query = view.api_query(&FILTER_PARAMS);
    let result = match view.values.get_trimmed("q") {
        Some(term) => {
            query = query.filter("query", term);
            api.search_products(query).await
        }
        None => api.list_products(query).await,
    };
    result.map_err(|err| {
        log::error!("Failed to fetch products: {err}");
        err.into()
    })
}

fn product_rows(items: &[Product]) -> ServiceResult<Vec<Row>> {
    Ok(rows_from(items, |product: &Product| product.id)?
        .into_iter()
        .map(|row| {
            let id = row.id.clone();
            row.with_actions(vec![RowAction::new(
                RowActionKind::Export,
                format!("{PRODUCTS_PATH}/export?{SELECTED_PARAM}={id}"),
            )])
        })
        .collect())
}

pub async fn load_products<R>(api: &R, query: &str) -> ServiceResult<ListPageData>
where
    R: ProductReader + ?Sized,
{
    let view = ListView::new(PRODUCTS_PATH, product_filters(), query, PRODUCTS_PER_PAGE);
    let page = fetch(api, &view).await?;
    let rows = product_rows(&page.items)?;
    Ok(view.page_data(&products_table(), &rows, page.total, &filter_fields()))
}

/// Exports the selected products as CSV. `query` carries the list filters and
/// the `selected` ids; without a selection every matching product is
/// exported, up to [`EXPORT_LIMIT`]. Selected ids are looked up page by page
/// until all of them are found or the matching products run out.
pub async fn export_products<R>(api: &R, query: &str) -> ServiceResult<Vec<u8>>
where
    R: ProductReader + ?Sized,
{
    let mut view = ListView::new(PRODUCTS_PATH, product_filters(), query, EXPORT_LIMIT);
    let selected: Vec<String> = view
        .values
        .get_all(SELECTED_PARAM)
        .into_iter()
        .filter(|id| !id.trim().is_empty())
        .map(|id| id.trim().to_string())
        .collect();
    view.values = without_page(&view.values);

    let rows = if selected.is_empty() {
        let page = fetch(api, &view).await?;
        product_rows(&page.items)?
    } else {
        collect_selected(api, &mut view, selected).await?
    };

    let count = rows.len();
    let csv = rows_to_csv(&products_table().columns, rows.iter()).map_err(|err| {
        log::error!("Failed to export products: {err}");
        err
    })?;
    log::info!("Exported {count} products");
    Ok(csv)
}

async fn collect_selected<R>(
    api: &R,
    view: &mut ListView<'_>,
    selected: Vec<String>,
) -> ServiceResult<Vec<Row>>
where
    R: ProductReader + ?Sized,
{
    let mut pending: BTreeSet<String> = selected.into_iter().collect();
    let mut rows = Vec::new();
    let mut page_number = 1;
    loop {
        view.values.set("page", page_number.to_string());
        let page = fetch(api, view).await?;
        let fetched = page.items.len();
        let ids: Vec<&str> = pending.iter().map(String::as_str).collect();
        let found: Vec<Row> = selected_rows(&product_rows(&page.items)?, &ids)
            .into_iter()
            .cloned()
            .collect();
        for row in found {
            if pending.remove(&row.id) {
                rows.push(row);
            }
        }

        if pending.is_empty() || fetched == 0 || page_number * EXPORT_LIMIT >= page.total {
            break;
        }
        page_number += 1;
    }
    if !pending.is_empty() {
        log::warn!("Products not found for export: {pending:?}");
    }
    Ok(rows)
}

fn without_page(values: &FilterValues) -> FilterValues {
    let mut values = values.clone();
    values.remove("page");
    values
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::{ApiResult, ListQuery};
    use crate::services::fake::{FakeApi, product};

    /// Catalog that honours pagination, unlike [`FakeApi`].
    struct PagedCatalog {
        products: Vec<Product>,
        pages: RefCell<Vec<usize>>,
    }

    impl PagedCatalog {
        fn with_products(count: i64) -> Self {
            Self {
                products: (1..=count).map(|id| product(id, &format!("Товар {id}"))).collect(),
                pages: RefCell::new(vec![]),
            }
        }

        fn page(&self, query: ListQuery) -> ApiResult<Page<Product>> {
            let (page, per_page) = query
                .pagination
                .map(|p| (p.page, p.per_page))
                .unwrap_or((1, 20));
            self.pages.borrow_mut().push(page);
            Ok(Page {
                items: self
                    .products
                    .iter()
                    .skip((page - 1) * per_page)
                    .take(per_page)
                    .cloned()
                    .collect(),
                total: self.products.len(),
            })
        }
    }

    impl ProductReader for PagedCatalog {
        async fn list_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
            self.page(query)
        }

        async fn search_products(&self, query: ListQuery) -> ApiResult<Page<Product>> {
            self.page(query)
        }
    }

    fn api() -> FakeApi {
        FakeApi {
            products: vec![product(1, "Кеды"), product(2, "Ботинки"), product(3, "Туфли")],
            ..FakeApi::default()
        }
    }

    #[actix_web::test]
    async fn plain_filters_use_the_list_endpoint() {
        let api = api();

        let page = load_products(&api, "status=active&group_id=7&price_from=100&sort=price&dir=desc")
            .await
            .unwrap();

        assert_eq!(api.calls(), vec!["list_products".to_string()]);
        let query = api.queries.borrow()[0].clone();
        assert_eq!(query.filter_value("status"), Some("active"));
        assert_eq!(query.filter_value("groupId"), Some("7"));
        assert_eq!(query.filter_value("priceFrom"), Some("100"));
        assert_eq!(query.filter_value("priceTo"), None);
        assert_eq!(query.sort.map(|s| (s.column, s.descending)), Some(("price".to_string(), true)));
        assert_eq!(page.table.rows.len(), 3);
        assert!(page.table.selectable);
    }

    #[actix_web::test]
    async fn text_query_switches_to_search() {
        let api = api();

        load_products(&api, "q=%D0%BA%D0%B5%D0%B4%D1%8B").await.unwrap();

        assert_eq!(api.calls(), vec!["search_products".to_string()]);
        assert_eq!(api.queries.borrow()[0].filter_value("query"), Some("кеды"));
    }

    #[actix_web::test]
    async fn selection_is_reflected_in_rows() {
        let api = api();

        let page = load_products(&api, "selected=2").await.unwrap();

        let selected: Vec<_> = page.table.rows.iter().map(|r| r.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
    }

    #[actix_web::test]
    async fn export_keeps_only_selected_rows() {
        let api = api();

        let csv = export_products(&api, "selected=1&selected=3&page=4").await.unwrap();
        let csv = String::from_utf8(csv).unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Фото,Название,Артикул"));
        assert!(lines[1].contains("Кеды"));
        assert!(lines[2].contains("Туфли"));
        let query = api.queries.borrow()[0].clone();
        assert_eq!(query.pagination.map(|p| (p.page, p.per_page)), Some((1, EXPORT_LIMIT)));
    }

    #[actix_web::test]
    async fn export_without_selection_takes_every_match() {
        let api = api();

        let csv = export_products(&api, "status=active").await.unwrap();

        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 4);
    }

    #[actix_web::test]
    async fn export_finds_selection_beyond_first_batch() {
        let api = PagedCatalog::with_products(1500);

        let csv = export_products(&api, "selected=1200&selected=7").await.unwrap();
        let csv = String::from_utf8(csv).unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Товар 7"));
        assert!(lines[2].contains("Товар 1200"));
        assert_eq!(*api.pages.borrow(), vec![1, 2]);
    }

    #[actix_web::test]
    async fn export_stops_once_selection_is_found() {
        let api = PagedCatalog::with_products(1500);

        export_products(&api, "selected=5").await.unwrap();

        assert_eq!(*api.pages.borrow(), vec![1]);
    }

    #[actix_web::test]
    async fn export_gives_up_after_last_page() {
        let api = PagedCatalog::with_products(1500);

        let csv = export_products(&api, "selected=9999").await.unwrap();

        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
        assert_eq!(*api.pages.borrow(), vec![1, 2]);
    }
}
