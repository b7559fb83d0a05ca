//! Excel (.xlsx) rendering

use super::layout::{meta_sheet, rates_sheet, Cell, Sheet};
use crate::data::fx::{QueryMeta, RateSeries};
use crate::error::{FxError, Result};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

const DATE_COLUMN_WIDTH: f64 = 12.0;

/// Render the series and its metadata as an in-memory xlsx workbook with
/// exactly two sheets, `Rates` and `Meta`.
pub fn to_xlsx_bytes(series: &RateSeries, meta: &QueryMeta) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for sheet in [rates_sheet(series), meta_sheet(meta)] {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, &sheet, &header_format, &date_format)?;
    }

    let bytes = workbook.save_to_buffer()?;
    log::debug!(
        "Wrote xlsx workbook: {} rows, {} bytes",
        series.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    header_format: &Format,
    date_format: &Format,
) -> Result<()> {
    worksheet.set_name(sheet.name)?;
    worksheet.set_column_width(0, DATE_COLUMN_WIDTH)?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let r = u32::try_from(r)
            .map_err(|_| FxError::ExportError(format!("too many rows in sheet {}", sheet.name)))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| {
                FxError::ExportError(format!("too many columns in sheet {}", sheet.name))
            })?;
            match cell {
                Cell::Text(text) if r == 0 => {
                    worksheet.write_string_with_format(r, c, text.as_str(), header_format)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text.as_str())?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(r, c, *value)?;
                }
                Cell::Date(date) => {
                    let excel_date = to_excel_date(*date)?;
                    worksheet.write_datetime_with_format(r, c, &excel_date, date_format)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(())
}

fn to_excel_date(date: chrono::NaiveDate) -> Result<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .map_err(|_| FxError::ExportError(format!("date out of range: {}", date)))?;
    // month/day always fit in u8
    Ok(ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?)
}
