//! Table export
//!
//! A series and its query metadata are laid out as two sheets, `Rates` and
//! `Meta`, then rendered as an xlsx byte stream. The Rates sheet can also be
//! rendered as CSV. Nothing here touches the file system.

pub mod delimited;
pub mod layout;
pub mod xlsx;

pub use delimited::write_csv;
pub use layout::{meta_sheet, rates_sheet, Cell, Sheet, META_SHEET, RATES_SHEET};
pub use xlsx::to_xlsx_bytes;
