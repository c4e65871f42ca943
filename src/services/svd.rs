//! SVD device and peripheral editors over the in-memory [`SvdStore`] copy.
//! Saving rebuilds the XML for display; nothing is sent anywhere.

use serde_json::{Map, Value, json};

use crate::dto::svd::{ControllerPageData, PeripheralPageData};
use crate::filters::FilterHelper;
use crate::forms::FieldErrors;
use crate::services::{ServiceError, ServiceResult};
use crate::svd::edit::{
    EditField, EditValue, apply_device_fields, apply_peripheral_fields, device_fields,
    peripheral_fields,
};
use crate::svd::model::{Cluster, Device, Peripheral, Register, RegisterItem};
use crate::svd::store::SvdStore;
use crate::svd::{SvdError, build_xml};
use crate::table::{
    CellKind, Column, EXPAND_PARAM, RenderContext, Row, RowAction, RowActionKind, Table,
};

pub const CONTROLLER_PATH: &str = "/controller";
pub const PERIPHERALS_PATH: &str = "/peripherals";

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn peripherals_table() -> Table {
    Table::new(vec![
        Column::new("name", "Название", CellKind::String).unsortable(),
        Column::new("groupName", "Группа", CellKind::String).unsortable(),
        Column::new("baseAddress", "Базовый адрес", CellKind::String).unsortable(),
        Column::new("derivedFrom", "Наследует", CellKind::String).unsortable(),
        Column::new("description", "Описание", CellKind::String).unsortable(),
    ])
    .empty_message("Периферия не описана")
}

fn registers_table() -> Table {
    Table::new(vec![
        Column::new("name", "Регистр / поле", CellKind::String).unsortable(),
        Column::new("offset", "Смещение / биты", CellKind::String).unsortable(),
        Column::new("access", "Доступ", CellKind::String).unsortable(),
        Column::new("resetValue", "Сброс", CellKind::String).unsortable(),
        Column::new("description", "Описание", CellKind::String).unsortable(),
    ])
    .empty_message("Регистров нет")
}

fn peripheral_rows(device: &Device) -> Vec<Row> {
    device
        .peripherals()
        .iter()
        .filter_map(|peripheral| {
            let name = peripheral.name.as_deref()?;
            let values = object(json!({
                "name": name,
                "groupName": peripheral.group_name,
                "baseAddress": peripheral.base_address,
                "derivedFrom": peripheral.derived_from,
                "description": peripheral.description,
            }));
            Some(Row::new(name, values).with_actions(vec![RowAction::new(
                RowActionKind::Edit,
                format!("{PERIPHERALS_PATH}/{name}"),
            )]))
        })
        .collect()
}

fn register_row(index: usize, register: &Register) -> Row {
    let id = register
        .name
        .clone()
        .unwrap_or_else(|| format!("register-{index}"));
    let fields = register
        .fields()
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let values = object(json!({
                "name": field.name,
                "offset": field.bits(),
                "access": field.access,
                "description": field.description,
            }));
            Row::new(format!("{id}.{position}"), values)
        })
        .collect();

    let values = object(json!({
        "name": register.name,
        "offset": register.address_offset,
        "access": register.access,
        "resetValue": register.reset_value,
        "description": register.description,
    }));
    Row::new(id, values).with_sub_rows(fields)
}

/// A cluster row expands into the registers it holds directly.
fn cluster_row(index: usize, cluster: &Cluster) -> Row {
    let id = cluster
        .name
        .clone()
        .unwrap_or_else(|| format!("cluster-{index}"));
    let registers = cluster
        .items
        .iter()
        .filter_map(|item| match item {
            RegisterItem::Register(register) => Some(register),
            RegisterItem::Cluster(_) => None,
        })
        .enumerate()
        .map(|(position, register)| {
            let values = object(json!({
                "name": register.name,
                "offset": register.address_offset,
                "access": register.access,
                "resetValue": register.reset_value,
                "description": register.description,
            }));
            Row::new(format!("{id}.{position}"), values)
        })
        .collect();

    let values = object(json!({
        "name": cluster.name,
        "offset": cluster.address_offset,
        "access": cluster.access,
        "resetValue": cluster.reset_value,
        "description": cluster.description,
    }));
    Row::new(id, values).with_sub_rows(registers)
}

fn controller_page(device: &Device, xml: Option<String>) -> ControllerPageData {
    let helper = FilterHelper::new(Vec::<(String, String)>::new());
    let values = helper.current_values("");
    let ctx = RenderContext {
        helper: &helper,
        path: CONTROLLER_PATH,
        values: &values,
    };
    ControllerPageData {
        name: device.name.clone().unwrap_or_default(),
        fields: device_fields(device),
        peripherals: peripherals_table().render(&peripheral_rows(device), &ctx),
        xml,
    }
}

fn peripheral_page(peripheral: &Peripheral, query: &str, xml: Option<String>) -> PeripheralPageData {
    let name = peripheral.name.clone().unwrap_or_default();
    let path = format!("{PERIPHERALS_PATH}/{name}");
    let helper = FilterHelper::new([(EXPAND_PARAM, "")]);
    let values = helper.current_values(query);
    let ctx = RenderContext {
        helper: &helper,
        path: &path,
        values: &values,
    };
    let rows: Vec<Row> = peripheral
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            RegisterItem::Register(register) => register_row(index, register),
            RegisterItem::Cluster(cluster) => cluster_row(index, cluster),
        })
        .collect();

    PeripheralPageData {
        fields: peripheral_fields(peripheral),
        registers: registers_table().render(&rows, &ctx),
        name,
        xml,
    }
}

fn rebuilt(device: &Device) -> ServiceResult<String> {
    build_xml(device).map_err(|err| {
        log::error!("Failed to build SVD document: {err}");
        err.into()
    })
}

async fn current_device(store: &SvdStore) -> ServiceResult<Device> {
    store.device().await.map_err(|err| {
        log::error!("Failed to load SVD document from {}: {err}", store.url());
        err.into()
    })
}

pub async fn load_controller(store: &SvdStore) -> ServiceResult<ControllerPageData> {
    let device = current_device(store).await?;
    Ok(controller_page(&device, None))
}

/// Applies the submitted device fields to the in-memory copy and returns the
/// page with the rebuilt XML.
pub async fn save_controller(
    store: &SvdStore,
    pairs: &[(String, String)],
) -> ServiceResult<ControllerPageData> {
    let mut device = current_device(store).await?;
    apply_device_fields(&mut device, pairs);
    let xml = rebuilt(&device)?;
    store.replace(device.clone());
    log::info!("Updated SVD device {}", device.name.as_deref().unwrap_or_default());
    Ok(controller_page(&device, Some(xml)))
}

/// Drops local edits and fetches the document again.
pub async fn reload_controller(store: &SvdStore) -> ServiceResult<()> {
    store.clear();
    current_device(store).await?;
    log::info!("Reloaded SVD document from {}", store.url());
    Ok(())
}

pub async fn load_peripheral(
    store: &SvdStore,
    name: &str,
    query: &str,
) -> ServiceResult<PeripheralPageData> {
    let device = current_device(store).await?;
    let peripheral = device
        .peripheral(name)
        .ok_or_else(|| SvdError::PeripheralNotFound(name.to_string()))?;
    Ok(peripheral_page(peripheral, query, None))
}

/// Attaches the messages in `errors` to the matching editor fields.
pub fn mark_errors(fields: &mut [EditField], errors: &FieldErrors) {
    for field in fields {
        field.errors = errors.get(&field.key).to_vec();
        if let EditValue::Nested(children) = &mut field.value {
            mark_errors(children, errors);
        }
    }
}

/// Pages and links address a peripheral by name, so a submitted name must be
/// present and not taken by another peripheral.
fn check_peripheral_name(
    device: &Device,
    current: &str,
    pairs: &[(String, String)],
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (_, value) in pairs.iter().filter(|(key, _)| key == "name") {
        let value = value.trim();
        if value.is_empty() {
            errors.add("name", "Обязательное поле");
        } else if value != current && device.peripheral(value).is_some() {
            errors.add("name", "Периферия с таким именем уже есть");
        }
    }
    errors
}

pub async fn save_peripheral(
    store: &SvdStore,
    name: &str,
    pairs: &[(String, String)],
) -> ServiceResult<PeripheralPageData> {
    let mut device = current_device(store).await?;
    let errors = check_peripheral_name(&device, name, pairs);
    if !errors.is_empty() {
        log::warn!("Peripheral {name} form rejected: {errors:?}");
        return Err(ServiceError::Validation(errors));
    }
    let peripheral = device
        .peripheral_mut(name)
        .ok_or_else(|| SvdError::PeripheralNotFound(name.to_string()))?;
    apply_peripheral_fields(peripheral, pairs);
    let peripheral = peripheral.clone();

    let xml = rebuilt(&device)?;
    store.replace(device);
    log::info!("Updated SVD peripheral {name}");
    Ok(peripheral_page(&peripheral, "", Some(xml)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svd::parse_device;

    const DEVICE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<device schemaVersion="1.1">
  <name>ARMCM3xxx</name>
  <resetValue>0x00000000</resetValue>
  <peripherals>
    <peripheral>
      <name>TIMER0</name>
      <baseAddress>0x40010000</baseAddress>
      <registers>
        <register>
          <name>CR</name>
          <addressOffset>0x00</addressOffset>
          <resetValue>0x00000000</resetValue>
          <fields>
            <field>
              <name>EN</name>
              <bitRange>[0:0]</bitRange>
            </field>
            <field>
              <name>MODE</name>
              <bitOffset>1</bitOffset>
              <bitWidth>3</bitWidth>
            </field>
          </fields>
        </register>
      </registers>
    </peripheral>
  </peripherals>
</device>"#;

    fn store() -> SvdStore {
        SvdStore::with_device(parse_device(DEVICE).unwrap())
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[actix_web::test]
    async fn controller_lists_peripherals() {
        let page = load_controller(&store()).await.unwrap();

        assert_eq!(page.name, "ARMCM3xxx");
        assert_eq!(page.peripherals.rows.len(), 1);
        assert_eq!(page.peripherals.rows[0].actions[0].href, "/peripherals/TIMER0");
        assert!(page.xml.is_none());
    }

    #[actix_web::test]
    async fn saving_device_rebuilds_xml_with_hex_prefix() {
        let store = store();

        let page = save_controller(&store, &pairs(&[("name", "ARMCM4"), ("resetValue", "FF")]))
            .await
            .unwrap();

        let xml = page.xml.unwrap();
        assert!(xml.contains("<name>ARMCM4</name>"));
        assert!(xml.contains("<resetValue>0xFF</resetValue>"));
        let stored = store.device().await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("ARMCM4"));
    }

    #[actix_web::test]
    async fn registers_expand_into_fields() {
        let page = load_peripheral(&store(), "TIMER0", "expand=CR").await.unwrap();

        let rows: Vec<_> = page
            .registers
            .rows
            .iter()
            .map(|row| (row.cells[0].text.as_str(), row.cells[1].text.as_str(), row.depth))
            .collect();
        assert_eq!(
            rows,
            vec![("CR", "0x00", 0), ("EN", "[0:0]", 1), ("MODE", "[3:1]", 1)]
        );
    }

    #[actix_web::test]
    async fn unknown_peripheral_is_not_found() {
        let result = load_peripheral(&store(), "UART9", "").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn saving_peripheral_updates_only_that_peripheral() {
        let store = store();

        let page = save_peripheral(&store, "TIMER0", &pairs(&[("baseAddress", "0x40020000")]))
            .await
            .unwrap();

        assert!(page.xml.unwrap().contains("<baseAddress>0x40020000</baseAddress>"));
        let device = store.device().await.unwrap();
        assert_eq!(
            device.peripheral("TIMER0").and_then(|p| p.base_address.as_deref()),
            Some("0x40020000")
        );
        assert_eq!(device.name.as_deref(), Some("ARMCM3xxx"));
    }

    #[actix_web::test]
    async fn blank_peripheral_name_is_rejected() {
        let store = store();

        let result = save_peripheral(&store, "TIMER0", &pairs(&[("name", "  ")])).await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.get("name"), ["Обязательное поле".to_string()]);
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
        let page = load_controller(&store).await.unwrap();
        assert_eq!(page.peripherals.rows.len(), 1);
        assert!(load_peripheral(&store, "TIMER0", "").await.is_ok());
    }

    #[actix_web::test]
    async fn errors_are_attached_to_their_fields() {
        let mut page = load_peripheral(&store(), "TIMER0", "").await.unwrap();
        let mut errors = FieldErrors::new();
        errors.add("name", "Обязательное поле");
        errors.add("addressBlock.size", "Некорректное значение");

        mark_errors(&mut page.fields, &errors);

        let name = page.fields.iter().find(|f| f.key == "name").unwrap();
        assert_eq!(name.errors, vec!["Обязательное поле".to_string()]);
        let block = page.fields.iter().find(|f| f.key == "addressBlock").unwrap();
        let EditValue::Nested(children) = &block.value else {
            panic!("address block is nested");
        };
        let size = children.iter().find(|f| f.key == "addressBlock.size").unwrap();
        assert_eq!(size.errors, vec!["Некорректное значение".to_string()]);
    }

    #[actix_web::test]
    async fn peripheral_cannot_take_a_used_name() {
        let mut device = parse_device(DEVICE).unwrap();
        let mut timer1 = device.peripheral("TIMER0").cloned().unwrap();
        timer1.name = Some("TIMER1".to_string());
        if let Some(peripherals) = device.peripherals.as_mut() {
            peripherals.peripheral.push(timer1);
        }
        let store = SvdStore::with_device(device);

        let result = save_peripheral(&store, "TIMER0", &pairs(&[("name", "TIMER1")])).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(load_peripheral(&store, "TIMER0", "").await.is_ok());
    }
}
