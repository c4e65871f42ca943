use serde::Serialize;

use crate::svd::edit::EditField;
use crate::table::TableView;

/// Data for the device editor page.
#[derive(Debug, Serialize)]
pub struct ControllerPageData {
    pub name: String,
    pub fields: Vec<EditField>,
    pub peripherals: TableView,
    /// Rebuilt document shown after a save.
    pub xml: Option<String>,
}

/// Data for the peripheral editor page.
#[derive(Debug, Serialize)]
pub struct PeripheralPageData {
    pub name: String,
    pub fields: Vec<EditField>,
    pub registers: TableView,
    pub xml: Option<String>,
}
