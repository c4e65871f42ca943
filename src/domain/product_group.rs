use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductGroupId, ProductGroupName, Slug};

/// Catalog group; nested groups arrive inline in `children`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroup {
    pub id: ProductGroupId,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<ProductGroupId>,
    #[serde(default)]
    pub is_active: bool,
    pub products_count: Option<u32>,
    #[serde(default)]
    pub children: Vec<ProductGroup>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewProductGroup {
    pub name: ProductGroupName,
    pub slug: Slug,
    pub parent_id: Option<ProductGroupId>,
    pub is_active: bool,
}
