//! Sheet layout shared by the export formats

use crate::data::fx::{QueryMeta, RateSeries};
use chrono::NaiveDate;

pub const RATES_SHEET: &str = "Rates";
pub const META_SHEET: &str = "Meta";

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

/// A named sheet, first row is the header
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub rows: Vec<Vec<Cell>>,
}

/// The series as a date-indexed table: `date`, then currency columns in series order.
pub fn rates_sheet(series: &RateSeries) -> Sheet {
    let mut header = Vec::with_capacity(series.columns().len() + 1);
    header.push(Cell::Text("date".to_string()));
    header.extend(series.columns().iter().map(|c| Cell::Text(c.to_string())));

    let mut rows = Vec::with_capacity(series.len() + 1);
    rows.push(header);
    for (date, cells) in series.rows() {
        let mut row = Vec::with_capacity(cells.len() + 1);
        row.push(Cell::Date(date));
        row.extend(cells.iter().map(|cell| match cell {
            Some(value) => Cell::Number(*value),
            None => Cell::Empty,
        }));
        rows.push(row);
    }

    Sheet {
        name: RATES_SHEET,
        rows,
    }
}

/// The query metadata as a two-column key/value table.
pub fn meta_sheet(meta: &QueryMeta) -> Sheet {
    let mut rows = vec![vec![
        Cell::Text("Key".to_string()),
        Cell::Text("Value".to_string()),
    ]];
    rows.extend(
        meta.entries()
            .into_iter()
            .map(|(key, value)| vec![Cell::Text(key.to_string()), Cell::Text(value)]),
    );

    Sheet {
        name: META_SHEET,
        rows,
    }
}
