//! Cell renderers, one per semantic column type.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

/// Semantic type of a column; decides how its cells are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    String,
    Binary,
    Int,
    /// Raw value to label mapping.
    Enum(Vec<(String, String)>),
    Date,
    Price,
    Photo,
    /// Like `Enum`, rendered as a coloured badge.
    Status(Vec<(String, String)>),
    Array,
    Link,
}

impl CellKind {
    pub fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(value, label)| (value.to_string(), label.to_string()))
            .collect()
    }
}

pub const EMPTY_CELL: &str = "—";

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CellView {
    pub text: String,
    pub class: String,
    pub href: Option<String>,
    pub image: Option<String>,
    pub items: Vec<String>,
}

impl CellView {
    fn text(text: impl Into<String>, class: &str) -> Self {
        Self {
            text: text.into(),
            class: class.to_string(),
            ..Self::default()
        }
    }

    fn empty() -> Self {
        Self::text(EMPTY_CELL, "cell-empty")
    }
}

/// Plain text of a JSON value, without quotes around strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn label_for<'a>(labels: &'a [(String, String)], raw: &'a str) -> &'a str {
    labels
        .iter()
        .find(|(value, _)| value == raw)
        .map_or(raw, |(_, label)| label.as_str())
}

/// Groups the integer part by thousands with a space: `1234567` → `1 234 567`.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount as `1 234.50 ₽`.
pub fn format_price(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{}.{frac_part} ₽", group_thousands(int_part))
}

fn format_date(raw: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}

/// Renders one cell. Missing and null values render as [`EMPTY_CELL`].
pub fn render_cell(kind: &CellKind, value: Option<&Value>) -> CellView {
    let value = match value {
        None | Some(Value::Null) => return CellView::empty(),
        Some(value) => value,
    };

    match kind {
        CellKind::String => CellView::text(value_text(value), "cell-string"),
        CellKind::Binary => match as_bool(value) {
            Some(true) => CellView::text("Да", "cell-binary cell-yes"),
            Some(false) => CellView::text("Нет", "cell-binary cell-no"),
            None => CellView::text(value_text(value), "cell-binary"),
        },
        CellKind::Int => match as_f64(value) {
            Some(n) => CellView::text(format!("{}", n.trunc() as i64), "cell-int"),
            None => CellView::text(value_text(value), "cell-int"),
        },
        CellKind::Enum(labels) => {
            let raw = value_text(value);
            CellView::text(label_for(labels, &raw), "cell-enum")
        }
        CellKind::Date => CellView::text(format_date(&value_text(value)), "cell-date"),
        CellKind::Price => match as_f64(value) {
            Some(amount) => CellView::text(format_price(amount), "cell-price"),
            None => CellView::text(value_text(value), "cell-price"),
        },
        CellKind::Photo => {
            let src = value_text(value);
            if src.is_empty() {
                return CellView::empty();
            }
            CellView {
                image: Some(src),
                class: "cell-photo".to_string(),
                ..CellView::default()
            }
        }
        CellKind::Status(labels) => {
            let raw = value_text(value);
            CellView::text(
                label_for(labels, &raw),
                &format!("status status-{}", raw.to_lowercase()),
            )
        }
        CellKind::Array => {
            let items: Vec<String> = match value {
                Value::Array(items) => items.iter().map(value_text).collect(),
                other => vec![value_text(other)],
            };
            if items.is_empty() {
                return CellView::empty();
            }
            CellView {
                text: items.join(", "),
                class: "cell-array".to_string(),
                items,
                ..CellView::default()
            }
        }
        CellKind::Link => {
            let href = value_text(value);
            CellView {
                text: href.clone(),
                class: "cell-link".to_string(),
                href: Some(href),
                ..CellView::default()
            }
        }
    }
}
