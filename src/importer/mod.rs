// ==========================================
// 控制 ANS - 导入层
// ==========================================
// 职责: 外部文件导入,生成领域记录
// 支持: Excel (.xlsx/.xlsm/.xls), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod inventory_importer;
pub mod raw_table;
pub mod work_order_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use inventory_importer::{InventoryImporter, SOURCE_B_HEADER_KEYWORD};
pub use raw_table::{RawRow, RawTable, SheetGrid};
pub use work_order_importer::{
    apply_form_status, CleanedWorkOrders, WorkOrderBatch, WorkOrderImporter, CLEAN_COLUMNS,
    EMPTY_FILL, FORM_MISSING,
};
