// ==========================================
// 控制 ANS - ANS 计算 API
// ==========================================
// 职责: 导入工单 → (表单左连接) → ANS 计算 → 导出工作簿
// 红线: 当前时间由调用方传入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AnsSettings, ConfigManager};
use crate::domain::types::SummaryLine;
use crate::engine::SlaEngine;
use crate::exporter::{ans_sheets, AnsMeta, ReportExporter};
use crate::importer::WorkOrderImporter;
use crate::perf::PerfGuard;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// ANS 批处理结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnsRunReport {
    /// 批次ID
    pub batch_id: String,
    /// 源文件名
    pub source_file: String,
    /// 工单总数
    pub total: usize,
    /// 按状态汇总（RESUMEN）
    pub by_status: Vec<SummaryLine>,
    /// 开始时间无法解析的工单数
    pub unparsed_start: usize,
    /// 表单有效记录数（未提供表单时为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_rows: Option<usize>,
    /// 生成的文件
    pub output_files: Vec<String>,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

/// ANS 计算 API
pub struct AnsApi {
    settings: AnsSettings,
    exporter: ReportExporter,
}

impl AnsApi {
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

    pub fn settings(&self) -> &AnsSettings {
        &self.settings
    }

    /// 执行 ANS 批处理
    ///
    /// # 参数
    /// - input: 工单导出（CSV/XLSX）
    /// - output: 输出路径（.xlsx / .csv / 目录）
    /// - form: 技术员表单（可选）
    /// - now: 计算基准时间
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        form: Option<&Path>,
        now: NaiveDateTime,
    ) -> ApiResult<AnsRunReport> {
        let perf = PerfGuard::new("ans_run");
        if input == output {
            return Err(ApiError::InvalidInput(format!(
                "输出路径不能与输入相同: {}",
                input.display()
            )));
        }

        let importer = WorkOrderImporter::new();
        let mut batch = importer.import(input)?;

        let form_rows = match form {
            Some(form_path) => Some(importer.attach_form_status(&mut batch.records, form_path)?),
            None => None,
        };

        let engine = SlaEngine::from_settings(&self.settings);
        let evaluated = engine.evaluate_batch(batch.records, now);
        let summary = SlaEngine::summarize(&evaluated);

        let meta = AnsMeta {
            source_name: self.settings.source_names.source_a.clone(),
            processed_at: now,
            origin_file: batch.source.clone(),
        };
        let sheets = ans_sheets(&evaluated, &summary, &self.settings.agreed_days_rules, &meta);
        let written = self.exporter.export(output, &sheets)?;

        let report = AnsRunReport {
            batch_id: Uuid::new_v4().to_string(),
            source_file: batch.source,
            total: evaluated.len(),
            by_status: summary,
            unparsed_start: batch.unparsed_start,
            form_rows,
            output_files: written.iter().map(|p| p.display().to_string()).collect(),
            elapsed_ms: perf.elapsed_ms(),
        };

        tracing::info!(
            batch_id = %report.batch_id,
            total = report.total,
            "ANS 批处理完成"
        );
        Ok(report)
    }
}
