// ==========================================
// 控制 ANS - Excel 写入器
// ==========================================
// 工具: rust_xlsxwriter
// 格式: 表头加粗 + 冻结首行,不做条件格式
// ==========================================

use crate::exporter::error::ExportResult;
use crate::exporter::sheet::{CellValue, SheetData};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Excel 单元格文本长度上限
const MAX_CELL_CHARS: usize = 32_767;

pub struct XlsxWriter;

impl XlsxWriter {
    /// 写入工作簿（覆盖已有文件）
    pub fn write(&self, path: &Path, sheets: &[SheetData]) -> ExportResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for sheet in sheets {
            sheet.validate()?;
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_sheet(worksheet, sheet, &header_format)?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &SheetData,
    header_format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, sanitize_cell(header), header_format)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(text) => {
                    worksheet.write_string(row_num, col, sanitize_cell(text))?;
                }
                CellValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                CellValue::Number(_) | CellValue::Empty => {}
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// 去除会破坏工作表 XML 的控制字符（保留 TAB / 换行）,超长文本截断
fn sanitize_cell(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            let u = c as u32;
            c == '\t' || c == '\n' || c == '\r' || !(u < 0x20 || u == 0x7F || u == 0xFFFE || u == 0xFFFF)
        })
        .take(MAX_CELL_CHARS)
        .collect()
}
