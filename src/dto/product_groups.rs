use serde::Serialize;

use crate::domain::types::ProductGroupId;
use crate::dto::{FormData, ListPageData};

/// Confirmation popup shown for `?confirm_delete={id}`.
#[derive(Debug, Serialize)]
pub struct ConfirmDelete {
    pub id: ProductGroupId,
    pub name: String,
    pub action_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProductGroupsPageData {
    pub list: ListPageData,
    pub confirm: Option<ConfirmDelete>,
}

#[derive(Debug, Serialize)]
pub struct ProductGroupFormPageData {
    pub id: Option<ProductGroupId>,
    pub form: FormData,
}

/// Suggestion returned by the parent group autocomplete.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GroupOption {
    pub value: String,
    pub label: String,
}
