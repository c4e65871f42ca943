//! Flattening of device and peripheral properties into editable fields.
//!
//! Only an allowlist of leaf properties is editable. Values are shown as
//! text; `resetValue` and `resetMask` are shown without their `0x` prefix and
//! get it back when applied.

use serde::Serialize;

use crate::svd::model::{AddressBlock, Cpu, Device, Interrupt, Peripheral};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EditValue {
    Scalar(String),
    Array(Vec<String>),
    Nested(Vec<EditField>),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditField {
    /// Form key, dotted for nested properties (`cpu.name`).
    pub key: String,
    /// Property name as it appears in the SVD document.
    pub name: String,
    pub value: EditValue,
    /// Messages shown when a submission was rejected.
    pub errors: Vec<String>,
}

impl EditField {
    fn new(key: String, name: &str, value: EditValue) -> Self {
        Self {
            key,
            name: name.to_string(),
            value,
            errors: vec![],
        }
    }

    fn scalar(prefix: Option<&str>, name: &str, value: Option<&str>) -> Self {
        Self::new(
            key(prefix, name),
            name,
            EditValue::Scalar(value.unwrap_or_default().to_string()),
        )
    }
}

fn key(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}

const HEX_PROPERTIES: [&str; 2] = ["resetValue", "resetMask"];

pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub fn hex_prefixed(value: &str) -> String {
    format!("0x{}", strip_hex_prefix(value))
}

fn display(name: &str, value: Option<&String>) -> Option<String> {
    let value = value?;
    if HEX_PROPERTIES.contains(&name) {
        Some(strip_hex_prefix(value).to_string())
    } else {
        Some(value.clone())
    }
}

/// Converts a submitted value back into the stored form; blank means absent.
fn stored(name: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if HEX_PROPERTIES.contains(&name) {
        Some(hex_prefixed(value))
    } else {
        Some(value.to_string())
    }
}

fn scalars(prefix: Option<&str>, props: &[(&str, Option<&String>)]) -> Vec<EditField> {
    props
        .iter()
        .map(|(name, value)| EditField::scalar(prefix, name, display(name, *value).as_deref()))
        .collect()
}

fn nested(name: &str, fields: Vec<EditField>) -> EditField {
    EditField::new(name.to_string(), name, EditValue::Nested(fields))
}

pub fn device_fields(device: &Device) -> Vec<EditField> {
    let mut fields = scalars(
        None,
        &[
            ("name", device.name.as_ref()),
            ("vendor", device.vendor.as_ref()),
            ("vendorID", device.vendor_id.as_ref()),
            ("series", device.series.as_ref()),
            ("version", device.version.as_ref()),
            ("description", device.description.as_ref()),
            ("addressUnitBits", device.address_unit_bits.as_ref()),
            ("width", device.width.as_ref()),
            ("size", device.size.as_ref()),
            ("access", device.access.as_ref()),
            ("resetValue", device.reset_value.as_ref()),
            ("resetMask", device.reset_mask.as_ref()),
        ],
    );

    let cpu = device.cpu.clone().unwrap_or_default();
    fields.push(nested(
        "cpu",
        scalars(
            Some("cpu"),
            &[
                ("name", cpu.name.as_ref()),
                ("revision", cpu.revision.as_ref()),
                ("endian", cpu.endian.as_ref()),
                ("mpuPresent", cpu.mpu_present.as_ref()),
                ("fpuPresent", cpu.fpu_present.as_ref()),
                ("nvicPrioBits", cpu.nvic_prio_bits.as_ref()),
                ("vendorSystickConfig", cpu.vendor_systick_config.as_ref()),
            ],
        ),
    ));
    fields
}

/// Applies submitted values to the device. Keys outside the allowlist are
/// ignored and properties that were not submitted keep their value.
pub fn apply_device_fields(device: &mut Device, pairs: &[(String, String)]) {
    for (key, value) in pairs {
        if let Some(cpu_key) = key.strip_prefix("cpu.") {
            let mut cpu = device.cpu.clone().unwrap_or_default();
            if apply_cpu_field(&mut cpu, cpu_key, value) {
                device.cpu = (cpu != Cpu::default() || device.cpu.is_some()).then_some(cpu);
            }
            continue;
        }

        let slot = match key.as_str() {
            "name" => &mut device.name,
            "vendor" => &mut device.vendor,
            "vendorID" => &mut device.vendor_id,
            "series" => &mut device.series,
            "version" => &mut device.version,
            "description" => &mut device.description,
            "addressUnitBits" => &mut device.address_unit_bits,
            "width" => &mut device.width,
            "size" => &mut device.size,
            "access" => &mut device.access,
            "resetValue" => &mut device.reset_value,
            "resetMask" => &mut device.reset_mask,
            _ => continue,
        };
        *slot = stored(key, value);
    }
}

fn apply_cpu_field(cpu: &mut Cpu, name: &str, value: &str) -> bool {
    let slot = match name {
        "name" => &mut cpu.name,
        "revision" => &mut cpu.revision,
        "endian" => &mut cpu.endian,
        "mpuPresent" => &mut cpu.mpu_present,
        "fpuPresent" => &mut cpu.fpu_present,
        "nvicPrioBits" => &mut cpu.nvic_prio_bits,
        "vendorSystickConfig" => &mut cpu.vendor_systick_config,
        _ => return false,
    };
    *slot = stored(name, value);
    true
}

pub fn peripheral_fields(peripheral: &Peripheral) -> Vec<EditField> {
    let mut fields = scalars(
        None,
        &[
            ("name", peripheral.name.as_ref()),
            ("version", peripheral.version.as_ref()),
            ("description", peripheral.description.as_ref()),
            ("groupName", peripheral.group_name.as_ref()),
            ("baseAddress", peripheral.base_address.as_ref()),
            ("size", peripheral.size.as_ref()),
            ("access", peripheral.access.as_ref()),
            ("resetValue", peripheral.reset_value.as_ref()),
            ("resetMask", peripheral.reset_mask.as_ref()),
        ],
    );

    fields.push(EditField::new(
        "interrupts".to_string(),
        "interrupts",
        EditValue::Array(
            peripheral
                .interrupt
                .iter()
                .filter_map(|interrupt| interrupt.name.clone())
                .collect(),
        ),
    ));

    let block = peripheral.address_block.first().cloned().unwrap_or_default();
    fields.push(nested(
        "addressBlock",
        scalars(
            Some("addressBlock"),
            &[
                ("offset", block.offset.as_ref()),
                ("size", block.size.as_ref()),
                ("usage", block.usage.as_ref()),
            ],
        ),
    ));
    fields
}

/// Applies submitted values to a peripheral.
///
/// `interrupts` may be repeated and each value may hold several names, one per
/// line. Interrupts that keep their name keep their number and description.
pub fn apply_peripheral_fields(peripheral: &mut Peripheral, pairs: &[(String, String)]) {
    let mut interrupt_names: Option<Vec<String>> = None;

    for (key, value) in pairs {
        if key == "interrupts" {
            interrupt_names.get_or_insert_with(Vec::new).extend(
                value
                    .lines()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
            continue;
        }

        if let Some(block_key) = key.strip_prefix("addressBlock.") {
            apply_address_block_field(peripheral, block_key, value);
            continue;
        }

        let slot = match key.as_str() {
            // The name addresses the peripheral and is never cleared.
            "name" if value.trim().is_empty() => continue,
            "name" => &mut peripheral.name,
            "version" => &mut peripheral.version,
            "description" => &mut peripheral.description,
            "groupName" => &mut peripheral.group_name,
            "baseAddress" => &mut peripheral.base_address,
            "size" => &mut peripheral.size,
            "access" => &mut peripheral.access,
            "resetValue" => &mut peripheral.reset_value,
            "resetMask" => &mut peripheral.reset_mask,
            _ => continue,
        };
        *slot = stored(key, value);
    }

    if let Some(names) = interrupt_names {
        let existing = std::mem::take(&mut peripheral.interrupt);
        peripheral.interrupt = names
            .into_iter()
            .map(|name| {
                existing
                    .iter()
                    .find(|interrupt| interrupt.name.as_deref() == Some(name.as_str()))
                    .cloned()
                    .unwrap_or(Interrupt {
                        name: Some(name),
                        ..Interrupt::default()
                    })
            })
            .collect();
    }
}

fn apply_address_block_field(peripheral: &mut Peripheral, name: &str, value: &str) {
    let value = stored(name, value);
    if peripheral.address_block.is_empty() {
        if value.is_none() {
            return;
        }
        peripheral.address_block.push(AddressBlock::default());
    }
    let block = &mut peripheral.address_block[0];
    match name {
        "offset" => block.offset = value,
        "size" => block.size = value,
        "usage" => block.usage = value,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn device() -> Device {
        Device {
            name: Some("ARMCM3xxx".to_string()),
            reset_value: Some("0x00000000".to_string()),
            reset_mask: Some("0xFFFFFFFF".to_string()),
            cpu: Some(Cpu {
                name: Some("CM3".to_string()),
                ..Cpu::default()
            }),
            ..Device::default()
        }
    }

    fn scalar_value<'a>(fields: &'a [EditField], key: &str) -> Option<&'a str> {
        fields.iter().find_map(|field| match &field.value {
            EditValue::Scalar(value) if field.key == key => Some(value.as_str()),
            EditValue::Nested(children) => scalar_value(children, key),
            _ => None,
        })
    }

    #[test]
    fn hex_values_are_shown_without_prefix() {
        let fields = device_fields(&device());
        assert_eq!(scalar_value(&fields, "resetMask"), Some("FFFFFFFF"));
        assert_eq!(scalar_value(&fields, "cpu.name"), Some("CM3"));
        assert_eq!(scalar_value(&fields, "vendor"), Some(""));
    }

    #[test]
    fn applying_restores_hex_prefix_and_ignores_unknown_keys() {
        let mut device = device();
        apply_device_fields(
            &mut device,
            &pairs(&[
                ("resetMask", "0000FFFF"),
                ("vendor", "ARM Ltd."),
                ("cpu.revision", "r2p1"),
                ("peripherals", "dropped"),
                ("cpu.unknown", "x"),
            ]),
        );
        assert_eq!(device.reset_mask.as_deref(), Some("0x0000FFFF"));
        assert_eq!(device.reset_value.as_deref(), Some("0x00000000"));
        assert_eq!(device.vendor.as_deref(), Some("ARM Ltd."));
        assert_eq!(
            device.cpu.as_ref().and_then(|cpu| cpu.revision.as_deref()),
            Some("r2p1")
        );
        assert!(device.peripherals.is_none());
    }

    #[test]
    fn hex_prefix_is_not_doubled() {
        assert_eq!(hex_prefixed("0x10"), "0x10");
        assert_eq!(hex_prefixed("10"), "0x10");
    }

    #[test]
    fn blank_cpu_stays_absent() {
        let mut device = Device::default();
        apply_device_fields(&mut device, &pairs(&[("cpu.name", "")]));
        assert!(device.cpu.is_none());
    }

    #[test]
    fn interrupts_keep_their_numbers() {
        let mut peripheral = Peripheral {
            name: Some("TIMER0".to_string()),
            interrupt: vec![Interrupt {
                name: Some("TIMER0".to_string()),
                value: Some("8".to_string()),
                ..Interrupt::default()
            }],
            ..Peripheral::default()
        };

        let fields = peripheral_fields(&peripheral);
        assert!(fields.iter().any(|field| field.key == "interrupts"
            && field.value == EditValue::Array(vec!["TIMER0".to_string()])));

        apply_peripheral_fields(
            &mut peripheral,
            &pairs(&[
                ("interrupts", "TIMER0\nTIMER0_OVF"),
                ("addressBlock.size", "0x100"),
                ("baseAddress", "0x40010000"),
            ]),
        );

        assert_eq!(peripheral.interrupt.len(), 2);
        assert_eq!(peripheral.interrupt[0].value.as_deref(), Some("8"));
        assert_eq!(peripheral.interrupt[1].name.as_deref(), Some("TIMER0_OVF"));
        assert_eq!(peripheral.address_block[0].size.as_deref(), Some("0x100"));
        assert_eq!(peripheral.base_address.as_deref(), Some("0x40010000"));
    }

    #[test]
    fn missing_interrupts_key_leaves_them_alone() {
        let mut peripheral = Peripheral {
            interrupt: vec![Interrupt::default()],
            ..Peripheral::default()
        };
        apply_peripheral_fields(&mut peripheral, &pairs(&[("name", "UART0")]));
        assert_eq!(peripheral.interrupt.len(), 1);
        assert_eq!(peripheral.name.as_deref(), Some("UART0"));
    }

    #[test]
    fn blank_name_keeps_the_peripheral_addressable() {
        let mut peripheral = Peripheral {
            name: Some("TIMER0".to_string()),
            ..Peripheral::default()
        };
        apply_peripheral_fields(&mut peripheral, &pairs(&[("name", " "), ("version", "")]));
        assert_eq!(peripheral.name.as_deref(), Some("TIMER0"));
        assert!(peripheral.version.is_none());
    }
}
