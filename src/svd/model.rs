//! Typed CMSIS-SVD device tree.
//!
//! Every leaf is kept as the raw element text so that a parsed document
//! serializes back without reformatting numbers (`0x40000000` stays hex).
//! Struct fields follow the schema's element order, which is the order they
//! are written back in. Registers and clusters keep their document order.
//! The content of `vendorExtensions` is vendor defined and is dropped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "device", rename_all = "camelCase")]
pub struct Device {
    #[serde(rename = "@schemaVersion", default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(rename = "@xmlns:xs", default, skip_serializing_if = "Option::is_none")]
    pub xmlns_xs: Option<String>,
    /// The reader drops the `xs:` prefix of attribute names.
    #[serde(
        rename(
            serialize = "@xs:noNamespaceSchemaLocation",
            deserialize = "@noNamespaceSchemaLocation"
        ),
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(rename = "vendorID", default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Cpu>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_system_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_definitions_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_unit_bits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peripherals: Option<Peripherals>,
}

impl Device {
    pub fn peripherals(&self) -> &[Peripheral] {
        self.peripherals
            .as_ref()
            .map(|p| p.peripheral.as_slice())
            .unwrap_or_default()
    }

    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals().iter().find(|p| p.name.as_deref() == Some(name))
    }

    pub fn peripheral_mut(&mut self, name: &str) -> Option<&mut Peripheral> {
        self.peripherals
            .as_mut()?
            .peripheral
            .iter_mut()
            .find(|p| p.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cpu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpu_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpu_present: Option<String>,
    #[serde(rename = "fpuDP", default, skip_serializing_if = "Option::is_none")]
    pub fpu_dp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsp_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icache_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcache_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itcm_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtcm_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vtor_present: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nvic_prio_bits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_systick_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_num_interrupts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sau_num_regions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sau_regions_config: Option<SauRegionsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SauRegionsConfig {
    #[serde(rename = "@enabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    #[serde(
        rename = "@protectionWhenDisabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub protection_when_disabled: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub region: Vec<SauRegion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SauRegion {
    #[serde(rename = "@enabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<String>,
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peripherals {
    #[serde(default)]
    pub peripheral: Vec<Peripheral>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peripheral {
    #[serde(rename = "@derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_increment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_array_index: Option<DimArrayIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_peripheral: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepend_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub append_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_struct_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_block: Vec<AddressBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interrupt: Vec<Interrupt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registers: Option<Registers>,
}

impl Peripheral {
    /// Registers and clusters directly under `<registers>`, in document order.
    pub fn items(&self) -> &[RegisterItem] {
        self.registers
            .as_ref()
            .map(|r| r.items.as_slice())
            .unwrap_or_default()
    }

    /// Registers directly under `<registers>`, without those inside clusters.
    pub fn registers(&self) -> Vec<&Register> {
        self.items()
            .iter()
            .filter_map(|item| match item {
                RegisterItem::Register(register) => Some(register),
                RegisterItem::Cluster(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimArrayIndex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_enum_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerated_value: Vec<EnumeratedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    #[serde(rename = "$value", default)]
    pub items: Vec<RegisterItem>,
}

/// One child of `<registers>` or `<cluster>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegisterItem {
    Register(Register),
    Cluster(Cluster),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(rename = "@derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_increment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_array_index: Option<DimArrayIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_struct_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_mask: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<RegisterItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[serde(rename = "@derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_increment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_array_index: Option<DimArrayIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_register: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_struct_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_write_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_constraint: Option<WriteConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Fields>,
}

impl Register {
    pub fn fields(&self) -> &[Field] {
        self.fields
            .as_ref()
            .map(|f| f.field.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    #[serde(default)]
    pub field: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_as_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_enumerated_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<WriteRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "@derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_increment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_array_index: Option<DimArrayIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_write_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_constraint: Option<WriteConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerated_values: Vec<EnumeratedValues>,
}

impl Field {
    /// Bit span as `[msb:lsb]`, whichever of the three SVD notations is used.
    /// `None` when the offset is missing or the span does not fit in 32 bits.
    pub fn bits(&self) -> Option<String> {
        if let Some(range) = &self.bit_range {
            return Some(range.clone());
        }
        if let (Some(msb), Some(lsb)) = (&self.msb, &self.lsb) {
            return Some(format!("[{msb}:{lsb}]"));
        }
        let offset: u32 = parse_number(self.bit_offset.as_deref()?)?;
        let width: u32 = self
            .bit_width
            .as_deref()
            .and_then(parse_number)
            .unwrap_or(1);
        let msb = offset.checked_add(width.saturating_sub(1))?;
        Some(format!("[{msb}:{offset}]"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumeratedValues {
    #[serde(rename = "@derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_enum_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerated_value: Vec<EnumeratedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumeratedValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<String>,
}

/// Parses SVD scalar numbers: decimal, `0x` hex or `#` binary.
pub fn parse_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = raw.strip_prefix('#') {
        u32::from_str_radix(bin, 2).ok()
    } else {
        raw.parse().ok()
    }
}
