// ==========================================
// 控制 ANS - 导出层
// ==========================================
// 职责: 计算结果 → Excel 工作簿 / CSV 文件
// 工具: rust_xlsxwriter, csv
// ==========================================

pub mod csv_writer;
pub mod error;
pub mod report_exporter;
pub mod report_sheets;
pub mod sheet;
pub mod xlsx_writer;

// 重导出核心类型
pub use csv_writer::CsvWriter;
pub use error::{ExportError, ExportResult};
pub use report_exporter::{OutputFormat, ReportExporter, RetryPolicy};
pub use report_sheets::{
    ans_sheets, cleaning_sheets, reconciliation_sheets, AnsMeta, DERIVED_COLUMNS,
    ISO_TIMESTAMP_FORMAT, META_TIMESTAMP_FORMAT,
};
pub use sheet::{CellValue, SheetData};
pub use xlsx_writer::XlsxWriter;
