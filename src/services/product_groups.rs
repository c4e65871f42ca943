//! Product group tree, editor and delete confirmation.

use validator::Validate;

use crate::api::{ListQuery, ProductGroupReader, ProductGroupWriter};
use crate::domain::product_group::{NewProductGroup, ProductGroup};
use crate::domain::types::ProductGroupId;
use crate::dto::product_groups::{
    ConfirmDelete, GroupOption, ProductGroupFormPageData, ProductGroupsPageData,
};
use crate::filters::FilterHelper;
use crate::forms::FieldErrors;
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::product_groups::{ProductGroupForm, product_group_fields};
use crate::services::{ListView, ServiceError, ServiceResult, form_data};
use crate::table::{CellKind, Column, Row, RowAction, RowActionKind, Table};

pub const PRODUCT_GROUPS_PATH: &str = "/product-groups";
pub const PRODUCT_GROUPS_PER_PAGE: usize = 50;
/// Maximum number of suggestions returned to the parent autocomplete.
pub const OPTIONS_LIMIT: usize = 10;

pub fn product_group_filters() -> FilterHelper {
    FilterHelper::new([
        ("name", ""),
        ("page", ""),
        ("expand", ""),
        ("confirm_delete", ""),
    ])
}

fn groups_table() -> Table {
    Table::new(vec![
        Column::new("name", "Название", CellKind::String).unsortable(),
        Column::new("slug", "Слаг", CellKind::String).unsortable(),
        Column::new("productsCount", "Товаров", CellKind::Int).unsortable(),
        Column::new("isActive", "Активна", CellKind::Binary).unsortable(),
    ])
    .empty_message("Групп пока нет")
}

fn group_row(group: &ProductGroup) -> ServiceResult<Row> {
    let mut values = serde_json::to_value(group)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    if let Some(map) = values.as_object_mut() {
        map.remove("children");
    }
    let values = match values {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    let sub_rows = group
        .children
        .iter()
        .map(group_row)
        .collect::<ServiceResult<Vec<_>>>()?;

    let id = group.id;
    Ok(Row::new(id, values)
        .with_sub_rows(sub_rows)
        .with_actions(vec![
            RowAction::new(
                RowActionKind::Edit,
                format!("{PRODUCT_GROUPS_PATH}/{id}/edit"),
            ),
            // Opens the confirmation popup; the popup posts the delete.
            RowAction::new(
                RowActionKind::Delete,
                format!("{PRODUCT_GROUPS_PATH}?confirm_delete={id}"),
            )
            .as_link(),
        ]))
}

fn find_group(groups: &[ProductGroup], id: ProductGroupId) -> Option<&ProductGroup> {
    groups.iter().find_map(|group| {
        if group.id == id {
            Some(group)
        } else {
            find_group(&group.children, id)
        }
    })
}

/// Loads the group tree. `?confirm_delete={id}` additionally opens the
/// confirmation popup for that group.
pub async fn load_product_groups<R>(api: &R, query: &str) -> ServiceResult<ProductGroupsPageData>
where
    R: ProductGroupReader + ?Sized,
{
    let view = ListView::new(
        PRODUCT_GROUPS_PATH,
        product_group_filters(),
        query,
        PRODUCT_GROUPS_PER_PAGE,
    );
    let page = api
        .list_product_groups(view.api_query(&[("name", "name")]))
        .await
        .map_err(|err| {
            log::error!("Failed to list product groups: {err}");
            err
        })?;

    let rows = page
        .items
        .iter()
        .map(group_row)
        .collect::<ServiceResult<Vec<_>>>()?;

    let confirm = view
        .values
        .get_trimmed("confirm_delete")
        .and_then(|id| id.parse::<i64>().ok())
        .and_then(|id| ProductGroupId::new(id).ok())
        .and_then(|id| find_group(&page.items, id))
        .map(|group| {
            let mut values = view.values.clone();
            values.remove("confirm_delete");
            ConfirmDelete {
                id: group.id,
                name: group.name.clone(),
                action_url: format!("{PRODUCT_GROUPS_PATH}/{}/delete", group.id),
                cancel_url: view.helper.submit_url(PRODUCT_GROUPS_PATH, &values),
            }
        });

    let filter_fields = vec![
        FieldDescriptor::new("name", "Название", FieldKind::Text).placeholder("Поиск"),
    ];

    Ok(ProductGroupsPageData {
        list: view.page_data(&groups_table(), &rows, page.total, &filter_fields),
        confirm,
    })
}

pub fn product_group_form_page(
    id: Option<ProductGroupId>,
    form: &ProductGroupForm,
    errors: &FieldErrors,
) -> ProductGroupFormPageData {
    let action = match id {
        Some(id) => format!("{PRODUCT_GROUPS_PATH}/{id}"),
        None => PRODUCT_GROUPS_PATH.to_string(),
    };
    let values = form.values();
    ProductGroupFormPageData {
        id,
        form: form_data(
            action,
            &product_group_fields(),
            |name| values.get(name).map(String::as_str),
            errors,
        ),
    }
}

pub async fn load_product_group_form<R>(
    api: &R,
    id: Option<i64>,
) -> ServiceResult<ProductGroupFormPageData>
where
    R: ProductGroupReader + ?Sized,
{
    let Some(id) = id else {
        let form = ProductGroupForm {
            is_active: Some("on".to_string()),
            ..ProductGroupForm::default()
        };
        return Ok(product_group_form_page(None, &form, &FieldErrors::new()));
    };

    let id = ProductGroupId::new(id)?;
    let group = api.get_product_group(id).await.map_err(|err| {
        log::error!("Failed to load product group {id}: {err}");
        err
    })?;
    Ok(product_group_form_page(
        Some(id),
        &ProductGroupForm::from_group(&group),
        &FieldErrors::new(),
    ))
}

pub async fn save_product_group<R>(
    api: &R,
    id: Option<i64>,
    form: ProductGroupForm,
) -> ServiceResult<ProductGroup>
where
    R: ProductGroupWriter + ?Sized,
{
    if let Err(errors) = form.validate() {
        return Err(ServiceError::Validation(FieldErrors::from(&errors)));
    }

    let group = NewProductGroup::try_from(form)?;
    let saved = match id {
        Some(id) => {
            let id = ProductGroupId::new(id)?;
            if group.parent_id == Some(id) {
                let mut errors = FieldErrors::new();
                errors.add("parent_id", "Группа не может быть родителем самой себя");
                return Err(ServiceError::Validation(errors));
            }
            api.update_product_group(id, &group).await
        }
        None => api.create_product_group(&group).await,
    }
    .map_err(|err| {
        log::error!("Failed to save product group: {err}");
        err
    })?;

    log::info!("Saved product group {}", saved.id);
    Ok(saved)
}

/// Issues exactly one delete for the group.
pub async fn delete_product_group<R>(api: &R, id: i64) -> ServiceResult<()>
where
    R: ProductGroupWriter + ?Sized,
{
    let id = ProductGroupId::new(id)?;
    api.delete_product_group(id).await.map_err(|err| {
        log::error!("Failed to delete product group {id}: {err}");
        err
    })?;
    log::info!("Deleted product group {id}");
    Ok(())
}

/// Suggestions for the parent group autocomplete, matched by name.
pub async fn product_group_options<R>(api: &R, term: &str) -> ServiceResult<Vec<GroupOption>>
where
    R: ProductGroupReader + ?Sized,
{
    let page = api
        .list_product_groups(ListQuery::new().filter("name", term))
        .await
        .map_err(|err| {
            log::error!("Failed to search product groups: {err}");
            err
        })?;

    let term = term.trim().to_lowercase();
    let mut options = Vec::new();
    let mut stack: Vec<&ProductGroup> = page.items.iter().rev().collect();
    while let Some(group) = stack.pop() {
        if options.len() == OPTIONS_LIMIT {
            break;
        }
        if term.is_empty() || group.name.to_lowercase().contains(&term) {
            options.push(GroupOption {
                value: group.id.to_string(),
                label: group.name.clone(),
            });
        }
        stack.extend(group.children.iter().rev());
    }
    Ok(options)
}


#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::{ApiError, ApiErrorKind};

    #[actix_web::test]
    async fn delete_sends_the_row_id() {
        let mut api = MockApi::new();
        api.expect_delete_product_group()
            .withf(|id| id.get() == 42)
            .times(1)
            .returning(|_| Ok(()));

        assert!(delete_product_group(&api, 42).await.is_ok());
    }

    #[actix_web::test]
    async fn delete_failure_is_propagated() {
        let mut api = MockApi::new();
        api.expect_delete_product_group()
            .times(1)
            .returning(|_| Err(ApiError::new(ApiErrorKind::Conflict, "group has products")));

        let result = delete_product_group(&api, 42).await;
        assert!(matches!(result, Err(ServiceError::Api(_))));
    }
}
