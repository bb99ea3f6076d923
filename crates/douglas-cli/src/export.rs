//! Workbook output for scraped product rows.
//!
//! One sheet, a bold bordered header row, then one row per product. Rows for
//! products reported out of stock get a light red background.

use std::path::Path;

use douglas_core::{CellValue, Column, ProductRow};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

const COLUMN_WIDTH: f64 = 30.0;
const OUT_OF_STOCK_FILL: u32 = 0x00FF_C7CE;
/// Longest string Excel stores in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

struct Formats {
    header: Format,
    body: Format,
    highlighted: Format,
}

impl Formats {
    fn new() -> Self {
        let body = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Justify)
            .set_align(FormatAlign::VerticalJustify);
        let highlighted = body
            .clone()
            .set_background_color(Color::RGB(OUT_OF_STOCK_FILL));
        Self {
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
            body,
            highlighted,
        }
    }
}

/// Builds the workbook in memory.
///
/// # Errors
///
/// Returns [`XlsxError`] if the sheet name is rejected or a cell cannot be
/// written.
pub(crate) fn build_workbook(
    rows: &[ProductRow],
    sheet_name: &str,
) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;
    write_sheet(worksheet, rows)?;
    Ok(workbook)
}

/// Writes `rows` to an xlsx file at `path`.
///
/// # Errors
///
/// Returns an error if the workbook cannot be built or saved.
pub(crate) fn write_workbook(
    rows: &[ProductRow],
    path: &Path,
    sheet_name: &str,
) -> anyhow::Result<()> {
    let mut workbook = build_workbook(rows, sheet_name)?;
    workbook
        .save(path)
        .map_err(|e| anyhow::anyhow!("failed to save workbook to {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "workbook written");
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, rows: &[ProductRow]) -> Result<(), XlsxError> {
    let formats = Formats::new();

    for column in Column::ALL {
        let col = column_number(column);
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.set_column_format(col, &formats.body)?;
        worksheet.write_string_with_format(0, col, column.header(), &formats.header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        let format = if row.is_out_of_stock() {
            worksheet.set_row_format(row_num, &formats.highlighted)?;
            &formats.highlighted
        } else {
            &formats.body
        };

        for (column, value) in row.cells() {
            let col = column_number(column);
            match value {
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(row_num, col, clip(&text), format)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number_with_format(row_num, col, n, format)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean_with_format(row_num, col, b, format)?;
                }
            }
        }
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn column_number(column: Column) -> u16 {
    // Column::ALL has 13 entries.
    column.index() as u16
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
