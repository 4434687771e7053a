// ==========================================
// 控制 ANS - 工单清洗 API
// ==========================================
// 职责: 工单导出 → 清洗 → FENIX_CLEAN / RESUMEN
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnsSettings, ConfigManager};
use crate::domain::work_order::CleaningReport;
use crate::exporter::{cleaning_sheets, ReportExporter};
use crate::importer::WorkOrderImporter;
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 清洗批处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningRunReport {
    pub batch_id: String,
    pub report: CleaningReport,
    pub output_files: Vec<String>,
    pub elapsed_ms: u64,
}

/// 工单清洗 API
pub struct CleaningApi {
    settings: AnsSettings,
    exporter: ReportExporter,
}

impl CleaningApi {
    pub fn new(settings: AnsSettings) -> Self {
        Self {
            settings,
            exporter: ReportExporter::default(),
        }
    }

    pub fn from_config(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let settings = ConfigManager::new(config_path).load_settings()?;
        Ok(Self::new(settings))
    }

    pub fn with_exporter(mut self, exporter: ReportExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// 执行清洗批处理
    pub fn run(&self, input: &Path, output: &Path) -> ApiResult<CleaningRunReport> {
        let perf = PerfGuard::new("cleaning_run");
        if input == output {
            return Err(ApiError::InvalidInput(format!(
                "输出路径不能与输入相同: {}",
                input.display()
            )));
        }

        let importer = WorkOrderImporter::new();
        let table = importer.load_table(input)?;
        let cleaned = importer.clean(table, &self.settings.valid_activities);

        let sheets = cleaning_sheets(&cleaned.table, &cleaned.report);
        let written = self.exporter.export(output, &sheets)?;

        Ok(CleaningRunReport {
            batch_id: Uuid::new_v4().to_string(),
            report: cleaned.report,
            output_files: written.iter().map(|p| p.display().to_string()).collect(),
            elapsed_ms: perf.elapsed_ms(),
        })
    }
}
