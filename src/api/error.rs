// ==========================================
// 控制 ANS - API 层错误类型
// ==========================================
// 职责: 汇总配置/导入/导出错误,供批处理入口统一返回
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 分层错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("报表导出失败: {0}")]
    Export(#[from] ExportError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_errors_convert() {
        let err: ApiError = ImportError::FileNotFound("fenix.csv".to_string()).into();
        assert!(matches!(err, ApiError::Import(_)));
        assert!(err.to_string().contains("fenix.csv"));

        let err: ApiError = ConfigError::DuplicateActivity("ACREV".to_string()).into();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
