// ==========================================
// 控制 ANS - 报表导出器
// ==========================================
// 职责: 按输出路径选择写入器 + 文件占用重试
// - *.xlsx         → 单个工作簿（写入的工作簿不含宏,不接受 .xlsm）
// - *.csv / 目录    → 每个工作表一个 CSV
// ==========================================

use crate::exporter::csv_writer::CsvWriter;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::sheet::SheetData;
use crate::exporter::xlsx_writer::XlsxWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

/// 默认重试次数
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// 默认重试间隔
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

// ==========================================
// OutputFormat - 输出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    CsvFile,
    CsvDirectory,
}

impl OutputFormat {
    /// 由输出路径判定格式
    ///
    /// 无扩展名或已存在的目录 → CSV 目录
    pub fn detect(output: &Path) -> ExportResult<Self> {
        if output.is_dir() {
            return Ok(OutputFormat::CsvDirectory);
        }
        match output.extension().and_then(|e| e.to_str()) {
            None => Ok(OutputFormat::CsvDirectory),
            Some(ext) => match ext.to_lowercase().as_str() {
                "xlsx" => Ok(OutputFormat::Xlsx),
                "csv" => Ok(OutputFormat::CsvFile),
                other => Err(ExportError::UnsupportedFormat(other.to_string())),
            },
        }
    }
}

// ==========================================
// RetryPolicy - 文件占用重试策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// 执行写入操作,仅在权限拒绝时重试
    pub fn run<T, F>(&self, path: &Path, mut op: F) -> ExportResult<T>
    where
        F: FnMut() -> ExportResult<T>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_permission_denied() => {
                    if attempt >= attempts {
                        return Err(ExportError::FileLocked {
                            path: path.display().to_string(),
                            attempts,
                        });
                    }
                    tracing::warn!(
                        path = %path.display(),
                        attempt,
                        "目标文件被占用,稍后重试"
                    );
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// ==========================================
// ReportExporter - 报表导出器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    retry: RetryPolicy,
}

impl ReportExporter {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// 导出工作表
    ///
    /// # 返回
    /// 生成的文件路径
    #[instrument(skip(self, sheets), fields(output = %output.display(), sheets = sheets.len()))]
    pub fn export(&self, output: &Path, sheets: &[SheetData]) -> ExportResult<Vec<PathBuf>> {
        let format = OutputFormat::detect(output)?;

        let written = match format {
            OutputFormat::Xlsx => {
                ensure_parent(output)?;
                self.retry.run(output, || XlsxWriter.write(output, sheets))?;
                vec![output.to_path_buf()]
            }
            OutputFormat::CsvFile => {
                ensure_parent(output)?;
                self.retry.run(output, || CsvWriter.write(output, sheets))?
            }
            OutputFormat::CsvDirectory => {
                std::fs::create_dir_all(output)?;
                self.retry.run(output, || CsvWriter.write(output, sheets))?
            }
        };

        tracing::info!(files = written.len(), "报表导出完成");
        Ok(written)
    }
}

fn ensure_parent(path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
