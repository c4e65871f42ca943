//! The `{ data, meta, errors }` envelope every backend response is wrapped in.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub total: Option<usize>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorItem {
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

impl<T> Envelope<T> {
    /// First error message carried by the envelope, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// One page of a list endpoint together with the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
        }
    }
}

impl<T> From<Envelope<Vec<T>>> for Page<T> {
    fn from(envelope: Envelope<Vec<T>>) -> Self {
        let items = envelope.data.unwrap_or_default();
        let total = envelope
            .meta
            .and_then(|meta| meta.total)
            .unwrap_or(items.len());
        Self { total, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_uses_meta_total() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"data":[1,2],"meta":{"total":40},"errors":[]}"#).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.total, 40);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn page_falls_back_to_item_count() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(Page::from(envelope).total, 3);
    }

    #[test]
    fn first_error_is_exposed() {
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(
            r#"{"data":null,"errors":[{"code":"slug_taken","message":"Slug already used"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.first_error(), Some("Slug already used"));
    }
}
