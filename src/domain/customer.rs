use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::CustomerId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub orders_count: Option<u32>,
    #[serde(default)]
    pub is_blocked: bool,
    pub created_at: Option<DateTime<Utc>>,
}
