use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ProductGroupId, ProductId};

backend_status!(ProductStatus {
    Draft => "draft",
    Active => "active",
    Archived => "archived",
});

impl ProductStatus {
    /// Raw value and label pairs used by filters and status cells.
    pub const LABELS: [(&'static str, &'static str); 3] = [
        ("draft", "Черновик"),
        ("active", "Активен"),
        ("archived", "В архиве"),
    ];
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub status: ProductStatus,
    pub group_id: Option<ProductGroupId>,
    pub photo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_written_back_unchanged() {
        let status: ProductStatus = serde_json::from_str(r#""on_moderation""#).unwrap();
        assert_eq!(status, ProductStatus::Other("on_moderation".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""on_moderation""#);

        let status: ProductStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(status, ProductStatus::Archived);
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""archived""#);
    }
}
