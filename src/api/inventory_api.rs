// ==========================================
// 控制 ANS - 仓储对账 API
// ==========================================
// 职责: 导入 A/B 两侧物料明细 → 对账 → 导出工作簿
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnsSettings, ConfigManager};
use crate::domain::types::SummaryLine;
use crate::engine::ReconciliationEngine;
use crate::exporter::{reconciliation_sheets, ReportExporter};
use crate::importer::InventoryImporter;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 对账批处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRunReport {
    /// 批次ID
    pub batch_id: String,
    /// A 侧明细行数
    pub source_a_lines: usize,
    /// B 侧明细行数（过滤前）
    pub source_b_lines: usize,
    /// B 侧噪声行数（工单号/代码格式不合法）
    pub discarded_source_b: usize,
    /// CONTROL_ALMACEN 行数
    pub matched: usize,
    /// NO_COINCIDEN 行数
    pub unmatched: usize,
    /// 豁免代码保留数
    pub exempt_kept: usize,
    /// 互补对调整次数
    pub pair_adjustments: usize,
    /// 因互补对调整移出未匹配的行数
    pub unmatched_removed: usize,
    /// 按状态汇总（含 TOTAL GENERAL）
    pub summary: Vec<SummaryLine>,
    /// 生成的文件
    pub output_files: Vec<String>,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 仓储对账 API
pub struct InventoryApi {
    settings: AnsSettings,
    exporter: ReportExporter,
}

impl InventoryApi {
    pub fn new(settings: AnsSettings) -> Self {
        Self {
            settings,
            exporter: ReportExporter::default(),
        }
    }

    /// 由配置文件创建（None = 默认路径或内置默认值）
    pub fn from_config(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let settings = ConfigManager::new(config_path).load_settings()?;
        Ok(Self::new(settings))
    }

    pub fn with_exporter(mut self, exporter: ReportExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// 执行对账批处理
    ///
    /// # 参数
    /// - source_a: 系统导出（CSV/XLSX）
    /// - source_b: 内部消耗工作簿（XLSX/CSV）
    /// - output: 输出路径（.xlsx / .csv / 目录）
    pub fn run(&self, source_a: &Path, source_b: &Path, output: &Path) -> ApiResult<InventoryRunReport> {
        let perf = PerfGuard::new("inventory_run");
        if output == source_a || output == source_b {
            return Err(ApiError::InvalidInput(format!(
                "输出路径不能与输入相同: {}",
                output.display()
            )));
        }

        let importer = InventoryImporter::from_settings(&self.settings);
        let lines_a = importer.import_source_a(source_a)?;
        let lines_b = importer.import_source_b(source_b)?;
        let (source_a_lines, source_b_lines) = (lines_a.len(), lines_b.len());

        let engine = ReconciliationEngine::from_settings(&self.settings);
        let result = engine.reconcile(lines_a, lines_b);

        let sheets = reconciliation_sheets(&result, &self.settings.source_names);
        let written = self.exporter.export(output, &sheets)?;

        let report = InventoryRunReport {
            batch_id: Uuid::new_v4().to_string(),
            source_a_lines,
            source_b_lines,
            discarded_source_b: result.discarded_source_b,
            matched: result.matched.len(),
            unmatched: result.unmatched.len(),
            exempt_kept: result.exempt_kept,
            pair_adjustments: result.pair_adjustments,
            unmatched_removed: result.unmatched_removed,
            summary: result.summary,
            output_files: written.iter().map(|p| p.display().to_string()).collect(),
            elapsed_ms: perf.elapsed_ms(),
        };

        tracing::info!(
            batch_id = %report.batch_id,
            matched = report.matched,
            unmatched = report.unmatched,
            "对账批处理完成"
        );
        Ok(report)
    }
}
