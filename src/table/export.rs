//! CSV export of table rows.

use thiserror::Error;

use crate::table::cell::value_text;
use crate::table::{Column, Row};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the header titles and one record per row with the raw cell text.
/// Sub-rows are not exported.
pub fn rows_to_csv<'a, I>(columns: &[Column], rows: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| column.title.as_str()))?;
    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| row.value(&column.key).map(value_text).unwrap_or_default()),
        )?;
    }

    writer.into_inner().map_err(|err| err.into_error().into())
}

/// Keeps only the rows whose id is listed, preserving the row order.
pub fn selected_rows<'a>(rows: &'a [Row], ids: &[&str]) -> Vec<&'a Row> {
    rows.iter()
        .filter(|row| ids.contains(&row.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::table::CellKind;

    #[test]
    fn exports_titles_and_raw_values() {
        let columns = vec![
            Column::new("name", "Название", CellKind::String),
            Column::new("price", "Цена", CellKind::Price),
            Column::new("tags", "Теги", CellKind::Array),
        ];
        let rows = vec![
            Row::from_serialize(1, &json!({"name": "Лампа, настольная", "price": 990.5, "tags": ["a", "b"]}))
                .unwrap(),
            Row::from_serialize(2, &json!({"name": "Стул", "price": null})).unwrap(),
        ];

        let csv = String::from_utf8(rows_to_csv(&columns, &rows).unwrap()).unwrap();
        assert_eq!(
            csv,
            "Название,Цена,Теги\n\"Лампа, настольная\",990.5,\"a, b\"\nСтул,,\n"
        );
    }

    #[test]
    fn selected_rows_keep_order() {
        let rows: Vec<Row> = (1..=4)
            .map(|id| Row::from_serialize(id, &json!({})).unwrap())
            .collect();
        let picked = selected_rows(&rows, &["3", "1"]);
        let ids: Vec<&str> = picked.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
