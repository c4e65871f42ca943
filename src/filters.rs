//! Two-way mapping between list filters and URL query parameters.
//!
//! List pages keep their filter, sort and page state in the query string so
//! that every view is bookmarkable. [`FilterHelper`] reads the current values
//! from a query string (falling back to per-view defaults) and builds the URLs
//! used by the filter form, the sortable headers and the pagination links.

use std::collections::BTreeMap;

use serde::Serialize;

/// Name of the 1-indexed page parameter.
pub const PAGE_PARAM: &str = "page";
/// Name of the sort column parameter.
pub const SORT_PARAM: &str = "sort";
/// Name of the sort direction parameter (`asc` / `desc`).
pub const DIR_PARAM: &str = "dir";

/// Ordered filter values; a key may carry several values (`status=a&status=b`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterValues(Vec<(String, String)>);

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-blank value stored under `key`, trimmed.
    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replaces every value under `key` with a single one, keeping the
    /// position of the first occurrence.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.0[index].1 = value;
                let mut seen = false;
                self.0.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    /// Appends a value under `key`, keeping the ones already there.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.0.push((key.to_string(), value.into()));
    }

    /// Removes one specific value stored under `key`.
    pub fn remove_value(&mut self, key: &str, value: &str) {
        self.0.retain(|(k, v)| !(k == key && v == value));
    }

    /// Replaces all values under `key` with `values`, appended at the end.
    pub fn replace_all<I, V>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.remove(key);
        self.0
            .extend(values.into_iter().map(|v| (key.to_string(), v.into())));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Pairs whose value is not blank.
    pub fn non_empty(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .cloned()
            .collect()
    }

    /// First value per key, for filling in filter form inputs.
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (k, v) in &self.0 {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        map
    }
}

/// Reads and writes the filter state of one list view.
#[derive(Debug, Clone)]
pub struct FilterHelper {
    defaults: Vec<(String, String)>,
}

impl FilterHelper {
    /// Creates a helper for the given keys and their default values.
    pub fn new<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            defaults: defaults
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(|(k, _)| k.as_str())
    }

    /// Derives the current values: every known key takes its values from the
    /// query string when present, otherwise its default. Unknown query keys are
    /// ignored and an unparsable query string yields the defaults.
    pub fn current_values(&self, query: &str) -> FilterValues {
        let parsed: Vec<(String, String)> = serde_html_form::from_str(query).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed query string {query:?}: {err}");
            Vec::new()
        });

        let mut values = Vec::new();
        for (key, default) in &self.defaults {
            let from_query: Vec<&(String, String)> =
                parsed.iter().filter(|(k, _)| k == key).collect();
            if from_query.is_empty() {
                values.push((key.clone(), default.clone()));
            } else {
                values.extend(from_query.into_iter().cloned());
            }
        }
        FilterValues(values)
    }

    /// Builds `path?query` for the given values, dropping empty ones.
    pub fn submit_url(&self, path: &str, values: &FilterValues) -> String {
        let pairs = values.non_empty();
        if pairs.is_empty() {
            return path.to_string();
        }
        match serde_html_form::to_string(&pairs) {
            Ok(query) => format!("{path}?{query}"),
            Err(err) => {
                log::error!("Failed to encode filters: {err}");
                path.to_string()
            }
        }
    }

    /// URL of the given page with every other filter preserved. Page 1 is the
    /// default and is left out of the query.
    pub fn page_url(&self, path: &str, values: &FilterValues, page: usize) -> String {
        let mut values = values.clone();
        if page <= 1 {
            values.remove(PAGE_PARAM);
        } else {
            values.set(PAGE_PARAM, page.to_string());
        }
        self.submit_url(path, &values)
    }

    /// URL sorting by `column`. Clicking the active ascending column flips it to
    /// descending; any other click sorts ascending. The page is reset.
    pub fn sort_url(&self, path: &str, values: &FilterValues, column: &str) -> String {
        let mut values = values.clone();
        let active = values.get(SORT_PARAM) == Some(column);
        let descending = active && values.get(DIR_PARAM) != Some("desc");
        values.set(SORT_PARAM, column);
        values.set(DIR_PARAM, if descending { "desc" } else { "asc" });
        values.remove(PAGE_PARAM);
        self.submit_url(path, &values)
    }
}

/// Current 1-indexed page; anything unparsable or zero means the first page.
pub fn page(values: &FilterValues) -> usize {
    values
        .get(PAGE_PARAM)
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Active sort column and direction, if any.
pub fn sort(values: &FilterValues) -> Option<(&str, bool)> {
    values
        .get_trimmed(SORT_PARAM)
        .map(|column| (column, values.get(DIR_PARAM) == Some("desc")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> FilterHelper {
        FilterHelper::new([
            ("q", ""),
            ("status", "active"),
            ("page", "1"),
            ("sort", ""),
            ("dir", ""),
        ])
    }

    #[test]
    fn query_values_override_defaults() {
        let values = helper().current_values("status=archived&q=boots&utm_source=mail");
        assert_eq!(values.get("q"), Some("boots"));
        assert_eq!(values.get("status"), Some("archived"));
        assert_eq!(values.get("page"), Some("1"));
        assert_eq!(values.get("utm_source"), None);
    }

    #[test]
    fn repeated_keys_are_kept_in_order() {
        let values = helper().current_values("status=new&status=shipped");
        assert_eq!(values.get_all("status"), vec!["new", "shipped"]);
    }

    #[test]
    fn malformed_query_degrades_to_defaults() {
        let values = helper().current_values("%%%=&&==");
        assert_eq!(values.get("status"), Some("active"));
    }

    #[test]
    fn submit_drops_empty_values() {
        let helper = helper();
        let values = FilterValues::from_pairs([("q", ""), ("status", "draft"), ("sort", " ")]);
        assert_eq!(helper.submit_url("/products", &values), "/products?status=draft");
        assert_eq!(
            helper.submit_url("/products", &FilterValues::from_pairs([("q", "")])),
            "/products"
        );
    }

    #[test]
    fn non_empty_values_round_trip() {
        let helper = helper();
        let values = FilterValues::from_pairs([
            ("q", "red & blue shoes"),
            ("status", "archived"),
            ("page", "4"),
            ("sort", "price"),
            ("dir", "desc"),
        ]);
        let url = helper.submit_url("/products", &values);
        let query = url.split_once('?').map(|(_, q)| q).unwrap();
        let parsed = helper.current_values(query);
        assert_eq!(parsed.non_empty(), values.non_empty());
    }

    #[test]
    fn page_url_preserves_filters() {
        let helper = helper();
        let values = helper.current_values("q=boots&page=2");
        assert_eq!(
            helper.page_url("/products", &values, 3),
            "/products?q=boots&status=active&page=3"
        );
        assert_eq!(
            helper.page_url("/products", &values, 1),
            "/products?q=boots&status=active"
        );
    }

    #[test]
    fn sort_url_toggles_direction_and_resets_page() {
        let helper = helper();
        let values = helper.current_values("sort=price&dir=asc&page=5");
        assert_eq!(
            helper.sort_url("/products", &values, "price"),
            "/products?status=active&sort=price&dir=desc"
        );
        let values = helper.current_values("sort=price&dir=desc");
        assert_eq!(
            helper.sort_url("/products", &values, "price"),
            "/products?status=active&sort=price&dir=asc"
        );
        assert_eq!(
            helper.sort_url("/products", &values, "name"),
            "/products?status=active&sort=name&dir=asc"
        );
    }

    #[test]
    fn page_parsing_is_lenient() {
        assert_eq!(page(&FilterValues::from_pairs([("page", "3")])), 3);
        assert_eq!(page(&FilterValues::from_pairs([("page", "0")])), 1);
        assert_eq!(page(&FilterValues::from_pairs([("page", "abc")])), 1);
        assert_eq!(page(&FilterValues::new()), 1);
    }

    #[test]
    fn sort_reads_direction() {
        let values = FilterValues::from_pairs([("sort", "price"), ("dir", "desc")]);
        assert_eq!(sort(&values), Some(("price", true)));
        assert_eq!(sort(&FilterValues::from_pairs([("sort", "")])), None);
    }
}
