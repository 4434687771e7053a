// ==========================================
// 控制 ANS - 工单导入器
// ==========================================
// 职责: 工单导出文件 → WorkOrderRecord
//       + 清洗（有效作业过滤 / 去引号 / 空值填充 / 清洗汇总）
//       + 技术员表单状态左连接
// ==========================================
// 流程: 文件解析 → 列名标准化 → 必需列补齐 → 字段映射
// ==========================================

use crate::domain::work_order::{CleaningReport, WorkOrderRecord};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{
    FieldMapper, COL_ACTIVITY, COL_ADDRESS, COL_INSTALLATION, COL_ORDER, COL_START,
    REQUIRED_WORK_ORDER_COLUMNS,
};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::raw_table::RawTable;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::instrument;

/// 清洗后保留的列（按输出顺序）
pub const CLEAN_COLUMNS: [&str; 17] = [
    "PEDIDO",
    "PRODUCTO_ID",
    "TIPO_TRABAJO",
    "TIPO_ELEMENTO_ID",
    "FECHA_RECIBO",
    "FECHA_INICIO_ANS",
    "CLIENTEID",
    "NOMBRE_CLIENTE",
    "TELEFONO_CONTACTO",
    "CELULAR_CONTACTO",
    "DIRECCION",
    "MUNICIPIO",
    "INSTALACION",
    "AREA_TRABAJO",
    "ACTIVIDAD",
    "NOMBRE",
    "TIPO_DIRECCION",
];

/// 清洗阶段空值填充
pub const EMPTY_FILL: &str = "SIN DATOS";

/// 表单状态缺失填充
pub const FORM_MISSING: &str = "SIN DATO";

/// 表单列（标准化后）
const FORM_ORDER_COLUMNS: [&str; 2] = ["NUMERO_DEL_PEDIDO", "PEDIDO"];
const FORM_STATUS_COLUMNS: [&str; 2] = ["ESTADO_DEL_PEDIDO", "FORMULARIO_FENIX"];

// ==========================================
// WorkOrderBatch - 工单导入结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkOrderBatch {
    pub source: String,               // 源文件名
    pub records: Vec<WorkOrderRecord>,
    pub unparsed_start: usize,        // 开始时间非空但无法解析
}

// ==========================================
// CleanedWorkOrders - 清洗结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CleanedWorkOrders {
    pub table: RawTable,
    pub report: CleaningReport,
}

pub struct WorkOrderImporter {
    parser: UniversalFileParser,
    cleaner: DataCleaner,
    mapper: FieldMapper,
}

impl Default for WorkOrderImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkOrderImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            cleaner: DataCleaner,
            mapper: FieldMapper::new(),
        }
    }

    /// 读取文件并标准化列名
    pub fn load_table(&self, path: &Path) -> ImportResult<RawTable> {
        let mut table = self.parser.parse(path)?;
        table.rename_headers(|h| self.cleaner.normalize_column_name(h));
        Ok(table)
    }

    // ==========================================
    // ANS 计算输入
    // ==========================================

    /// 导入工单（不过滤作业代码）
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import(&self, path: &Path) -> ImportResult<WorkOrderBatch> {
        let table = self.load_table(path)?;
        let mut batch = self.records_from_table(table);
        batch.source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        tracing::info!(
            total = batch.records.len(),
            unparsed_start = batch.unparsed_start,
            "工单导入完成"
        );
        Ok(batch)
    }

    /// 标准化后的表 → 工单记录
    pub fn records_from_table(&self, mut table: RawTable) -> WorkOrderBatch {
        for column in REQUIRED_WORK_ORDER_COLUMNS {
            table.ensure_column(column);
        }

        let mut unparsed_start = 0;
        let records = table
            .rows
            .iter()
            .map(|row| {
                let record = self.mapper.map_work_order(&table, row);
                if record.start.is_none() && !self.cleaner.is_null(table.value(row, COL_START)) {
                    unparsed_start += 1;
                    tracing::debug!(
                        row = row.row_number,
                        value = table.value(row, COL_START),
                        "开始时间无法解析"
                    );
                }
                record
            })
            .collect();

        WorkOrderBatch {
            source: table.sheet.clone(),
            records,
            unparsed_start,
        }
    }

    // ==========================================
    // 技术员表单左连接
    // ==========================================

    /// 读取表单文件并左连接到工单
    ///
    /// # 返回
    /// 表单中的有效记录数
    #[instrument(skip(self, records), fields(path = %form_path.display()))]
    pub fn attach_form_status(
        &self,
        records: &mut [WorkOrderRecord],
        form_path: &Path,
    ) -> ImportResult<usize> {
        let table = self.load_table(form_path)?;
        let statuses = self.form_statuses(&table);
        let total = statuses.len();
        apply_form_status(records, &statuses);
        tracing::info!(form_rows = total, "表单状态连接完成");
        Ok(total)
    }

    /// 表单表 → 工单号 → 状态（重复工单号以最后一条为准）
    pub fn form_statuses(&self, table: &RawTable) -> HashMap<String, String> {
        let order_col = FORM_ORDER_COLUMNS
            .iter()
            .find(|c| table.column_index(c).is_some());
        let status_col = FORM_STATUS_COLUMNS
            .iter()
            .find(|c| table.column_index(c).is_some());

        let (order_col, status_col) = match (order_col, status_col) {
            (Some(o), Some(s)) => (*o, *s),
            _ => {
                tracing::warn!(headers = ?table.headers, "表单缺少工单号或状态列");
                return HashMap::new();
            }
        };

        let mut statuses = HashMap::new();
        for row in &table.rows {
            let order_id = self.cleaner.clean_text(table.value(row, order_col), false);
            if self.cleaner.is_null(&order_id) {
                continue;
            }
            let status = self.cleaner.clean_text(table.value(row, status_col), false);
            statuses.insert(order_id, status);
        }
        statuses
    }

    // ==========================================
    // 清洗
    // ==========================================

    /// 清洗工单导出
    ///
    /// 1) 保留固定列（缺失列补空）
    /// 2) 仅保留有效作业代码
    /// 3) 地址/安装点去引号
    /// 4) 空值填充 "SIN DATOS"
    /// 5) 统计全空行 / 重复工单号 / 无法解析的开始时间
    #[instrument(skip(self, table, valid_activities), fields(rows = table.len()))]
    pub fn clean(&self, mut table: RawTable, valid_activities: &BTreeSet<String>) -> CleanedWorkOrders {
        let mut report = CleaningReport {
            total_rows: table.len(),
            ..CleaningReport::default()
        };

        table.select_columns(&CLEAN_COLUMNS);
        let activity_idx = table.column_index(COL_ACTIVITY);
        let quote_indices: Vec<usize> = [COL_ADDRESS, COL_INSTALLATION]
            .iter()
            .filter_map(|c| table.column_index(c))
            .collect();

        table.rows.retain(|row| {
            let activity = activity_idx
                .and_then(|idx| row.cells.get(idx))
                .map(|v| v.trim().to_uppercase())
                .unwrap_or_default();
            valid_activities.contains(&activity)
        });
        report.kept_rows = table.len();
        report.discarded_activity = report.total_rows - report.kept_rows;

        for row in table.rows.iter_mut() {
            for &idx in &quote_indices {
                row.cells[idx] = self.cleaner.strip_quotes(&row.cells[idx]);
            }
            for cell in row.cells.iter_mut() {
                if self.cleaner.is_null(cell) {
                    *cell = EMPTY_FILL.to_string();
                }
            }
        }

        let order_idx = table.column_index(COL_ORDER);
        let start_idx = table.column_index(COL_START);
        let mut seen_orders = HashSet::new();
        for row in &table.rows {
            if row.cells.iter().all(|c| c == EMPTY_FILL) {
                report.empty_rows += 1;
            }
            if let Some(order_id) = order_idx.and_then(|idx| row.cells.get(idx)) {
                if !seen_orders.insert(order_id.clone()) {
                    report.duplicate_orders += 1;
                }
            }
            if let Some(start) = start_idx.and_then(|idx| row.cells.get(idx)) {
                if start != EMPTY_FILL && self.cleaner.parse_timestamp(start).is_none() {
                    report.unparsed_start += 1;
                }
            }
        }

        tracing::info!(
            total = report.total_rows,
            kept = report.kept_rows,
            discarded = report.discarded_activity,
            duplicates = report.duplicate_orders,
            "工单清洗完成"
        );

        CleanedWorkOrders { table, report }
    }
}

/// 左连接表单状态（未匹配 → "SIN DATO"）
pub fn apply_form_status(records: &mut [WorkOrderRecord], statuses: &HashMap<String, String>) {
    for record in records.iter_mut() {
        let status = statuses
            .get(record.order_id.trim())
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| FORM_MISSING.to_string());
        record.form_status = Some(status);
    }
}
