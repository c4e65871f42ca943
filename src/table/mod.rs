//! Generic data table.
//!
//! The table is a stateless renderer over one page of already-fetched rows.
//! Selection and expansion live in the query string (`selected`, `expand`)
//! next to the filters, so [`Table::render`] only needs the current
//! [`FilterValues`] to produce a [`TableView`] for the `partials/table.html`
//! template.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::filters::{FilterHelper, FilterValues, SORT_PARAM, sort};

pub mod cell;
pub mod export;
pub mod selection;

pub use cell::{CellKind, CellView, render_cell};
pub use export::{ExportError, rows_to_csv, selected_rows};
pub use selection::{HeaderState, Selection};

/// Query parameter carrying the selected row ids.
pub const SELECTED_PARAM: &str = "selected";
/// Query parameter carrying the ids of expanded rows.
pub const EXPAND_PARAM: &str = "expand";

pub const DEFAULT_EMPTY_MESSAGE: &str = "Нет данных";

#[derive(Debug, Clone)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub kind: CellKind,
    pub disable_sort: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: CellKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            disable_sort: false,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.disable_sort = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowActionKind {
    Edit,
    Delete,
    Copy,
    Export,
}

impl RowActionKind {
    pub fn tooltip(self) -> &'static str {
        match self {
            RowActionKind::Edit => "Редактировать",
            RowActionKind::Delete => "Удалить",
            RowActionKind::Copy => "Копировать",
            RowActionKind::Export => "Экспорт",
        }
    }

    /// Export and delete change server state and are submitted as forms.
    pub fn method(self) -> &'static str {
        match self {
            RowActionKind::Delete | RowActionKind::Export => "post",
            RowActionKind::Edit | RowActionKind::Copy => "get",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub href: String,
    pub method: &'static str,
}

impl RowAction {
    pub fn new(kind: RowActionKind, href: impl Into<String>) -> Self {
        Self {
            kind,
            href: href.into(),
            method: kind.method(),
        }
    }

    /// Plain link, e.g. a delete that first opens a confirmation popup.
    pub fn as_link(mut self) -> Self {
        self.method = "get";
        self
    }
}

#[derive(Debug, Clone)]
pub struct Row {
    pub id: String,
    pub values: Map<String, Value>,
    pub sub_rows: Vec<Row>,
    pub actions: Vec<RowAction>,
}

impl Row {
    pub fn new(id: impl ToString, values: Map<String, Value>) -> Self {
        Self {
            id: id.to_string(),
            values,
            sub_rows: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Builds a row from any serializable item. Non-object values produce a
    /// row without cells.
    pub fn from_serialize<T: Serialize>(id: impl ToString, item: &T) -> serde_json::Result<Self> {
        let values = match serde_json::to_value(item)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self::new(id, values))
    }

    pub fn with_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_sub_rows(mut self, sub_rows: Vec<Row>) -> Self {
        self.sub_rows = sub_rows;
        self
    }

    /// Looks a cell value up by key; dotted keys (`customer.name`) walk into
    /// nested objects.
    pub fn value(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        let mut parts = key.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub title: String,
    pub sort_url: Option<String>,
    /// `asc` or `desc` when the table is sorted by this column.
    pub sorted: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionView {
    pub kind: RowActionKind,
    pub href: String,
    pub tooltip: &'static str,
    pub method: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub depth: usize,
    pub cells: Vec<CellView>,
    pub selected: bool,
    pub select_url: Option<String>,
    pub expandable: bool,
    pub expanded: bool,
    pub toggle_url: Option<String>,
    pub actions: Vec<ActionView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub selectable: bool,
    pub select_all: HeaderState,
    pub select_all_url: Option<String>,
    pub selected: Vec<String>,
    pub has_actions: bool,
    pub is_empty: bool,
    pub empty_message: String,
}

/// Where the table is rendered: used to build sort, selection and expansion
/// links that keep the other query parameters.
pub struct RenderContext<'a> {
    pub helper: &'a FilterHelper,
    pub path: &'a str,
    pub values: &'a FilterValues,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    pub selectable: bool,
    pub empty_message: String,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            selectable: false,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn render(&self, rows: &[Row], ctx: &RenderContext<'_>) -> TableView {
        let selection = Selection::from_ids(ctx.values.get_all(SELECTED_PARAM));
        let expanded: BTreeSet<&str> = ctx.values.get_all(EXPAND_PARAM).into_iter().collect();
        let page_ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();

        let mut views = Vec::new();
        for row in rows {
            self.push_row(row, 0, ctx, &selection, &expanded, &mut views);
        }

        let (select_all_url, select_all) = if self.selectable {
            let mut toggled = selection.clone();
            toggled.toggle_all(&page_ids);
            (
                Some(selection_url(ctx, &toggled)),
                selection.header_state(&page_ids),
            )
        } else {
            (None, HeaderState::Unchecked)
        };

        TableView {
            headers: self.headers(ctx),
            has_actions: rows.iter().any(|row| !row.actions.is_empty()),
            is_empty: rows.is_empty(),
            rows: views,
            selectable: self.selectable,
            select_all,
            select_all_url,
            selected: selection.ids().map(str::to_string).collect(),
            empty_message: self.empty_message.clone(),
        }
    }

    fn headers(&self, ctx: &RenderContext<'_>) -> Vec<HeaderView> {
        let active = sort(ctx.values);
        self.columns
            .iter()
            .map(|column| {
                let sortable = !column.disable_sort && ctx.helper.keys().any(|k| k == SORT_PARAM);
                let sorted = match active {
                    Some((key, descending)) if key == column.key => {
                        Some(if descending { "desc" } else { "asc" })
                    }
                    _ => None,
                };
                HeaderView {
                    key: column.key.clone(),
                    title: column.title.clone(),
                    sort_url: sortable
                        .then(|| ctx.helper.sort_url(ctx.path, ctx.values, &column.key)),
                    sorted,
                }
            })
            .collect()
    }

    fn push_row(
        &self,
        row: &Row,
        depth: usize,
        ctx: &RenderContext<'_>,
        selection: &Selection,
        expanded: &BTreeSet<&str>,
        out: &mut Vec<RowView>,
    ) {
        let expandable = !row.sub_rows.is_empty();
        let is_expanded = expandable && expanded.contains(row.id.as_str());
        let selectable = self.selectable && depth == 0;

        let select_url = selectable.then(|| {
            let mut toggled = selection.clone();
            toggled.toggle(&row.id);
            selection_url(ctx, &toggled)
        });

        let toggle_url = expandable.then(|| {
            let mut values = ctx.values.clone();
            if is_expanded {
                values.remove_value(EXPAND_PARAM, &row.id);
            } else {
                values.push(EXPAND_PARAM, row.id.clone());
            }
            ctx.helper.submit_url(ctx.path, &values)
        });

        out.push(RowView {
            id: row.id.clone(),
            depth,
            cells: self
                .columns
                .iter()
                .map(|column| render_cell(&column.kind, row.value(&column.key)))
                .collect(),
            selected: selectable && selection.is_selected(&row.id),
            select_url,
            expandable,
            expanded: is_expanded,
            toggle_url,
            actions: row
                .actions
                .iter()
                .map(|action| ActionView {
                    kind: action.kind,
                    href: action.href.clone(),
                    tooltip: action.kind.tooltip(),
                    method: action.method,
                })
                .collect(),
        });

        if is_expanded {
            for sub_row in &row.sub_rows {
                self.push_row(sub_row, depth + 1, ctx, selection, expanded, out);
            }
        }
    }
}

fn selection_url(ctx: &RenderContext<'_>, selection: &Selection) -> String {
    let mut values = ctx.values.clone();
    values.replace_all(SELECTED_PARAM, selection.ids());
    ctx.helper.submit_url(ctx.path, &values)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn helper() -> FilterHelper {
        FilterHelper::new([
            ("status", ""),
            ("sort", ""),
            ("dir", ""),
            (SELECTED_PARAM, ""),
            (EXPAND_PARAM, ""),
        ])
    }

    fn row(id: i64, name: &str) -> Row {
        Row::from_serialize(id, &json!({ "name": name, "price": 1500, "meta": { "sku": "A-1" } }))
            .unwrap()
    }

    fn table() -> Table {
        Table::new(vec![
            Column::new("name", "Название", CellKind::String),
            Column::new("price", "Цена", CellKind::Price),
            Column::new("meta.sku", "Артикул", CellKind::String).unsortable(),
        ])
        .selectable()
    }

    #[test]
    fn renders_cells_and_sort_links() {
        let helper = helper();
        let values = helper.current_values("sort=price&dir=asc");
        let ctx = RenderContext {
            helper: &helper,
            path: "/products",
            values: &values,
        };
        let view = table().render(&[row(1, "Лампа")], &ctx);

        assert_eq!(view.rows[0].cells[0].text, "Лампа");
        assert_eq!(view.rows[0].cells[1].text, "1 500.00 ₽");
        assert_eq!(view.rows[0].cells[2].text, "A-1");
        assert_eq!(view.headers[1].sorted, Some("asc"));
        assert_eq!(
            view.headers[1].sort_url.as_deref(),
            Some("/products?sort=price&dir=desc")
        );
        assert!(view.headers[2].sort_url.is_none());
    }

    #[test]
    fn empty_rows_render_empty_state() {
        let helper = helper();
        let values = helper.current_values("");
        let ctx = RenderContext {
            helper: &helper,
            path: "/products",
            values: &values,
        };
        let view = table().empty_message("Товары не найдены").render(&[], &ctx);
        assert!(view.is_empty);
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, "Товары не найдены");
    }

    #[test]
    fn selection_comes_from_query() {
        let helper = helper();
        let values = helper.current_values("selected=2");
        let ctx = RenderContext {
            helper: &helper,
            path: "/products",
            values: &values,
        };
        let view = table().render(&[row(1, "a"), row(2, "b")], &ctx);

        assert_eq!(view.select_all, HeaderState::Indeterminate);
        assert!(!view.rows[0].selected);
        assert!(view.rows[1].selected);
        assert_eq!(
            view.rows[0].select_url.as_deref(),
            Some("/products?selected=1&selected=2")
        );
        assert_eq!(view.rows[1].select_url.as_deref(), Some("/products"));
        assert_eq!(
            view.select_all_url.as_deref(),
            Some("/products?selected=1&selected=2")
        );
    }

    #[test]
    fn expanded_rows_flatten_sub_rows() {
        let helper = helper();
        let parent = row(1, "Одежда").with_sub_rows(vec![row(2, "Обувь")]);

        let values = helper.current_values("");
        let ctx = RenderContext {
            helper: &helper,
            path: "/product-groups",
            values: &values,
        };
        let collapsed = table().render(std::slice::from_ref(&parent), &ctx);
        assert_eq!(collapsed.rows.len(), 1);
        assert!(collapsed.rows[0].expandable);
        assert_eq!(
            collapsed.rows[0].toggle_url.as_deref(),
            Some("/product-groups?expand=1")
        );

        let values = helper.current_values("expand=1");
        let ctx = RenderContext {
            helper: &helper,
            path: "/product-groups",
            values: &values,
        };
        let expanded = table().render(&[parent], &ctx);
        assert_eq!(expanded.rows.len(), 2);
        assert_eq!(expanded.rows[1].depth, 1);
        assert!(expanded.rows[1].select_url.is_none());
        assert_eq!(
            expanded.rows[0].toggle_url.as_deref(),
            Some("/product-groups")
        );
    }

    #[test]
    fn actions_carry_tooltips() {
        let helper = helper();
        let values = helper.current_values("");
        let ctx = RenderContext {
            helper: &helper,
            path: "/banners",
            values: &values,
        };
        let row = row(7, "Весна").with_actions(vec![
            RowAction::new(RowActionKind::Edit, "/banners/7/edit"),
            RowAction::new(RowActionKind::Delete, "/banners/7/delete"),
        ]);
        let view = Table::new(vec![]).render(&[row], &ctx);
        assert!(view.has_actions);
        assert_eq!(view.rows[0].actions[0].tooltip, "Редактировать");
        assert_eq!(view.rows[0].actions[1].method, "post");

        let confirm = RowAction::new(RowActionKind::Delete, "/product-groups?confirm_delete=7").as_link();
        assert_eq!(confirm.method, "get");
    }
}
