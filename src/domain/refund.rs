use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{OrderId, RefundId};

backend_status!(RefundStatus {
    Requested => "requested",
    Approved => "approved",
    Rejected => "rejected",
    Completed => "completed",
});

impl RefundStatus {
    pub const LABELS: [(&'static str, &'static str); 4] = [
        ("requested", "Запрошен"),
        ("approved", "Одобрен"),
        ("rejected", "Отклонён"),
        ("completed", "Выполнен"),
    ];
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub id: RefundId,
    pub order_id: OrderId,
    pub amount: f64,
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: Option<DateTime<Utc>>,
}
