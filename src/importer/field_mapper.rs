// ==========================================
// 控制 ANS - 字段映射器实现
// ==========================================
// 职责: 源字段 → 领域结构映射 + 类型转换
// 工单表: 列名已标准化（UPPER + 下划线 + 去重音）
// 物料表: 列名已转小写
// ==========================================

use crate::domain::inventory::InventoryLine;
use crate::domain::types::SourceTag;
use crate::domain::work_order::WorkOrderRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::raw_table::{RawRow, RawTable};
use std::collections::HashMap;

// ==========================================
// 工单表列名
// ==========================================
pub const COL_ORDER: &str = "PEDIDO";
pub const COL_ACTIVITY: &str = "ACTIVIDAD";
pub const COL_ZONE: &str = "TIPO_DIRECCION";
pub const COL_START: &str = "FECHA_INICIO_ANS";
pub const COL_ADDRESS: &str = "DIRECCION";
pub const COL_INSTALLATION: &str = "INSTALACION";

/// ANS 计算必需列（缺失时补空列）
pub const REQUIRED_WORK_ORDER_COLUMNS: [&str; 4] = [COL_ORDER, COL_ACTIVITY, COL_ZONE, COL_START];

// ==========================================
// 物料表列名（小写）
// ==========================================
pub const COL_LINE_ORDER: &str = "pedido";
pub const COL_LINE_CODE: &str = "item_res";
pub const COL_LINE_QUANTITY: &str = "cantidad";

/// A 侧保留的描述性列（按输出顺序）
pub const SOURCE_A_ATTRIBUTE_COLUMNS: [&str; 17] = [
    "subz",
    "municipio",
    "contrato",
    "acta",
    "actividad",
    "fecha_estado",
    "pagina",
    "urbrur",
    "tipre",
    "red_interna",
    "tipo_operacion",
    "tipo",
    "cobro",
    "suminis",
    "item_cont",
    "vlr_cliente",
    "valor_costo",
];

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    // ==========================================
    // 工单映射
    // ==========================================

    /// 原始行 → WorkOrderRecord
    pub fn map_work_order(&self, table: &RawTable, row: &RawRow) -> WorkOrderRecord {
        let text = |column: &str| {
            self.cleaner
                .normalize_null(Some(table.value(row, column).to_string()))
                .unwrap_or_default()
        };

        WorkOrderRecord {
            row_number: row.row_number,
            order_id: text(COL_ORDER),
            activity: self.cleaner.clean_text(&text(COL_ACTIVITY), true),
            zone: self.cleaner.clean_text(&text(COL_ZONE), true),
            start: self.cleaner.parse_timestamp(table.value(row, COL_START)),
            form_status: None,
            fields: table.to_fields(row),
        }
    }

    // ==========================================
    // 物料明细映射
    // ==========================================

    /// A 侧行（系统导出）→ InventoryLine
    pub fn map_source_a(&self, row: &HashMap<String, String>, row_number: usize) -> InventoryLine {
        let attributes = SOURCE_A_ATTRIBUTE_COLUMNS
            .iter()
            .filter_map(|column| {
                row.get(*column).map(|value| {
                    let value = self
                        .cleaner
                        .normalize_null(Some(value.clone()))
                        .unwrap_or_default();
                    (column.to_string(), value)
                })
            })
            .collect();

        InventoryLine {
            row_number,
            order_id: self.get_string(row, COL_LINE_ORDER).unwrap_or_default(),
            item_code: self.get_string(row, COL_LINE_CODE).unwrap_or_default(),
            quantity: self
                .get_string(row, COL_LINE_QUANTITY)
                .map(|v| self.cleaner.parse_quantity(&v))
                .unwrap_or(0.0),
            source: SourceTag::SourceA,
            attributes,
        }
    }

    /// B 侧行（内部消耗表）→ InventoryLine
    ///
    /// 格式校验在对账引擎中完成,此处只做映射。
    pub fn map_source_b(&self, row: &HashMap<String, String>, row_number: usize) -> InventoryLine {
        InventoryLine {
            row_number,
            order_id: self.get_fuzzy(row, "#pedido", "pedido").unwrap_or_default(),
            item_code: self.get_fuzzy(row, "codigo", "codigo").unwrap_or_default(),
            quantity: self
                .get_fuzzy(row, "cantidad", "cantidad")
                .map(|v| self.cleaner.parse_quantity(&v))
                .unwrap_or(0.0),
            source: SourceTag::SourceB,
            attributes: Vec::new(),
        }
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: Vec<&str> = match key {
            COL_LINE_ORDER => vec!["pedido", "#pedido"],
            COL_LINE_CODE => vec!["item_res", "codigo", "código"],
            COL_LINE_QUANTITY => vec!["cantidad", "cantidad_fenix"],
            _ => vec![key],
        };

        for alias in aliases {
            if let Some(value) = row.get(alias) {
                if let Some(clean) = self.cleaner.normalize_null(Some(value.clone())) {
                    return Some(clean);
                }
            }
        }
        None
    }

    /// 先按精确列名,再按列名包含关键字查找
    fn get_fuzzy(&self, row: &HashMap<String, String>, key: &str, fragment: &str) -> Option<String> {
        if let Some(value) = self.get_string(row, key) {
            return Some(value);
        }

        let mut candidates: Vec<&String> = row
            .keys()
            .filter(|column| self.fold(column).contains(fragment))
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .find_map(|column| self.cleaner.normalize_null(row.get(column).cloned()))
    }

    fn fold(&self, column: &str) -> String {
        self.cleaner.normalize_column_name(column).to_lowercase()
    }
}
