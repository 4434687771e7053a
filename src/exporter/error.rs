// ==========================================
// 控制 ANS - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 文件相关错误 =====
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("目标文件被占用（已重试 {attempts} 次）: {path}")]
    FileLocked { path: String, attempts: u32 },

    #[error("输出格式不支持: {0}（仅支持 .xlsx/.csv/目录）")]
    UnsupportedFormat(String),

    // ===== 写入器错误 =====
    #[error("Excel 写入失败: {0}")]
    Xlsx(String),

    #[error("CSV 写入失败: {0}")]
    Csv(String),

    #[error("工作表数据无效 ({sheet}): {message}")]
    InvalidSheet { sheet: String, message: String },
}

impl ExportError {
    /// 是否为目标文件被占用（权限拒绝）
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ExportError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

// 实现 From<XlsxError>（保留 IO 错误以便识别文件占用）
impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        match err {
            XlsxError::IoError(e) => ExportError::Io(e),
            other => ExportError::Xlsx(other.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            if let csv::ErrorKind::Io(e) = err.into_kind() {
                return ExportError::Io(e);
            }
            return ExportError::Csv("IO 错误".to_string());
        }
        ExportError::Csv(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
