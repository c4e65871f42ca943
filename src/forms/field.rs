//! Field descriptors and the single render dispatch used by form templates.

use serde::Serialize;

use crate::forms::{FieldErrors, is_checked};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Options from `(raw value, label)` pairs.
    pub fn from_labels(labels: &[(&str, &str)]) -> Vec<Self> {
        labels
            .iter()
            .map(|(value, label)| Self::new(*value, *label))
            .collect()
    }
}

/// Input control of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Textarea,
    Password,
    Number,
    Select { options: Vec<SelectOption> },
    Switcher,
    Radio { options: Vec<SelectOption> },
    Checkbox,
    Calendar,
    FileUpload { accept: String, multiple: bool },
    /// Text input with suggestions fetched from `source?q=`.
    Autocomplete { source: String },
}

impl FieldKind {
    fn template(&self) -> &'static str {
        match self {
            FieldKind::Text
            | FieldKind::Password
            | FieldKind::Number
            | FieldKind::Calendar => "input",
            FieldKind::Textarea => "textarea",
            FieldKind::Select { .. } => "select",
            FieldKind::Switcher => "switcher",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::FileUpload { .. } => "file",
            FieldKind::Autocomplete { .. } => "autocomplete",
        }
    }

    fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Calendar => "date",
            FieldKind::FileUpload { .. } => "file",
            FieldKind::Switcher | FieldKind::Checkbox => "checkbox",
            FieldKind::Radio { .. } => "radio",
            _ => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Everything `partials/field.html` needs to draw one field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub template: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub placeholder: String,
    pub options: Vec<OptionView>,
    pub accept: Option<String>,
    pub multiple: bool,
    pub source: Option<String>,
    pub errors: Vec<String>,
}

/// Renders a field with its current value and inline errors.
pub fn render_field(descriptor: &FieldDescriptor, value: Option<&str>, errors: &FieldErrors) -> FieldView {
    let current = value.unwrap_or_default();

    let options = match &descriptor.kind {
        FieldKind::Select { options } | FieldKind::Radio { options } => options
            .iter()
            .map(|option| OptionView {
                value: option.value.clone(),
                label: option.label.clone(),
                selected: option.value == current,
            })
            .collect(),
        _ => Vec::new(),
    };

    let (accept, multiple) = match &descriptor.kind {
        FieldKind::FileUpload { accept, multiple } => (Some(accept.clone()), *multiple),
        _ => (None, false),
    };

    let source = match &descriptor.kind {
        FieldKind::Autocomplete { source } => Some(source.clone()),
        _ => None,
    };

    let checked = matches!(descriptor.kind, FieldKind::Switcher | FieldKind::Checkbox)
        && is_checked(value);

    FieldView {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        template: descriptor.kind.template(),
        input_type: descriptor.kind.input_type(),
        // Browsers never prefill file and password inputs.
        value: match descriptor.kind {
            FieldKind::Password | FieldKind::FileUpload { .. } => String::new(),
            _ => current.to_string(),
        },
        checked,
        required: descriptor.required,
        placeholder: descriptor.placeholder.clone().unwrap_or_default(),
        options,
        accept,
        multiple,
        source,
        errors: errors.get(&descriptor.name).to_vec(),
    }
}

/// Renders every descriptor, looking values up by field name.
pub fn render_fields<'a, F>(descriptors: &[FieldDescriptor], value_of: F, errors: &FieldErrors) -> Vec<FieldView>
where
    F: Fn(&str) -> Option<&'a str>,
{
    descriptors
        .iter()
        .map(|descriptor| render_field(descriptor, value_of(&descriptor.name), errors))
        .collect()
}
