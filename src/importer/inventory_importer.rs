// ==========================================
// 控制 ANS - 物料明细导入器
// ==========================================
// 职责: A 侧系统导出 / B 侧内部消耗工作簿 → InventoryLine
// A 侧: 首行为表头,列名转小写
// B 侧: 多工作表,跳过排除表,表头行按关键字 "cantidad" 定位
// ==========================================

use crate::config::AnsSettings;
use crate::domain::inventory::InventoryLine;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::raw_table::{RawTable, SheetGrid};
use std::path::Path;
use tracing::instrument;

/// B 侧表头行关键字
pub const SOURCE_B_HEADER_KEYWORD: &str = "cantidad";

pub struct InventoryImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
    excluded_sheets: Vec<String>, // 小写
}

impl Default for InventoryImporter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InventoryImporter {
    pub fn new(excluded_sheets: Vec<String>) -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
            excluded_sheets: excluded_sheets
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_settings(settings: &AnsSettings) -> Self {
        Self::new(settings.source_b_excluded_sheets.clone())
    }

    // ==========================================
    // A 侧
    // ==========================================

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_source_a(&self, path: &Path) -> ImportResult<Vec<InventoryLine>> {
        let table = self.parser.parse(path)?;
        let lines = self.source_a_from_table(table);
        tracing::info!(lines = lines.len(), "A 侧导入完成");
        Ok(lines)
    }

    pub fn source_a_from_table(&self, mut table: RawTable) -> Vec<InventoryLine> {
        table.rename_headers(|h| h.trim().to_lowercase());
        table
            .rows
            .iter()
            .map(|row| self.mapper.map_source_a(&table.to_record(row), row.row_number))
            .collect()
    }

    // ==========================================
    // B 侧
    // ==========================================

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_source_b(&self, path: &Path) -> ImportResult<Vec<InventoryLine>> {
        let grids = self.parser.read_grids(path)?;
        let lines = self.source_b_from_grids(grids, &path.display().to_string())?;
        tracing::info!(lines = lines.len(), "B 侧导入完成");
        Ok(lines)
    }

    /// 从工作表网格中定位表头并映射
    ///
    /// 取首个非排除、且包含表头关键字的工作表。
    ///
    /// # 错误
    /// - HeaderNotFound: 所有候选工作表均无表头关键字
    pub fn source_b_from_grids(
        &self,
        grids: Vec<SheetGrid>,
        source: &str,
    ) -> ImportResult<Vec<InventoryLine>> {
        for grid in grids {
            if self.is_excluded(&grid.name) {
                tracing::debug!(sheet = %grid.name, "跳过排除工作表");
                continue;
            }

            let Some(header_index) = grid.find_row_containing(SOURCE_B_HEADER_KEYWORD) else {
                tracing::debug!(sheet = %grid.name, "工作表无表头关键字");
                continue;
            };

            tracing::info!(
                sheet = %grid.name,
                header_row = grid.first_row + header_index + 1,
                "B 侧表头已定位"
            );

            let mut table = RawTable::from_grid(grid, header_index);
            table.rename_headers(|h| h.trim().to_lowercase());
            return Ok(table
                .rows
                .iter()
                .map(|row| self.mapper.map_source_b(&table.to_record(row), row.row_number))
                .collect());
        }

        Err(ImportError::HeaderNotFound {
            path: source.to_string(),
            keyword: SOURCE_B_HEADER_KEYWORD.to_string(),
        })
    }

    fn is_excluded(&self, sheet: &str) -> bool {
        let name = sheet.trim().to_lowercase();
        self.excluded_sheets.iter().any(|s| *s == name)
    }
}
