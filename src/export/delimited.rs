//! CSV rendering of the Rates sheet

use crate::data::fx::RateSeries;
use crate::error::Result;
use std::io::Write;

/// Write the series as CSV: a `date` column then the currency columns.
///
/// Values use the shortest representation that round-trips the `f64`;
/// missing cells are empty fields.
pub fn write_csv<W: Write>(series: &RateSeries, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(series.columns().len() + 1);
    header.push("date".to_string());
    header.extend(series.columns().iter().map(|c| c.to_string()));
    wtr.write_record(&header)?;

    for (date, cells) in series.rows() {
        let mut record = Vec::with_capacity(cells.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(
            cells
                .iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
