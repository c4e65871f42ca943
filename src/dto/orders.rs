use serde::Serialize;

use crate::domain::order::Order;
use crate::table::TableView;

/// Data for the order details page.
#[derive(Debug, Serialize)]
pub struct OrderPageData {
    pub order: Order,
    pub status_label: String,
    pub total: String,
    pub created_at: String,
    pub items: TableView,
}
