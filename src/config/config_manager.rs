// ==========================================
// 控制 ANS - 配置管理器
// ==========================================
// 职责: 定位配置文件、加载、校验
// 优先级: 显式路径 > 环境变量 CONTROL_ANS_CONFIG > 用户配置目录 > 内置默认值
// ==========================================

use crate::config::ans_config::{AnsConfig, AnsSettings};
use crate::config::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// 环境变量: 配置文件路径
pub const CONFIG_PATH_ENV: &str = "CONTROL_ANS_CONFIG";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    explicit_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - explicit_path: 显式指定的配置文件（必须存在）
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// 默认配置文件路径
    ///
    /// 1. 环境变量 CONTROL_ANS_CONFIG
    /// 2. <用户配置目录>/control-ans/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        dirs::config_dir().map(|dir| dir.join("control-ans").join("config.json"))
    }

    /// 加载配置（未校验）
    ///
    /// 显式路径不存在时报错；默认路径不存在时使用内置默认值。
    pub fn load(&self) -> ConfigResult<AnsConfig> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("未找到配置文件，使用内置默认配置");
                Ok(AnsConfig::default())
            }
        }
    }

    /// 加载并校验配置
    pub fn load_settings(&self) -> ConfigResult<AnsSettings> {
        self.load()?.into_settings()
    }

    /// 从文件读取配置
    pub fn load_from_file(path: &Path) -> ConfigResult<AnsConfig> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_json_str(&raw).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), "配置文件已加载");
        Ok(config)
    }

    /// 从 JSON 字符串解析配置（缺省字段取内置默认值）
    pub fn from_json_str(raw: &str) -> ConfigResult<AnsConfig> {
        serde_json::from_str(raw).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConfigManager::from_json_str(r#"{"exempt_codes": ["200384A"]}"#).unwrap();
        assert_eq!(config.exempt_codes, vec!["200384A".to_string()]);
        assert_eq!(config.agreed_days.len(), 10);
        assert_eq!(config.source_names.source_b, "ELITE");
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{"holidays": ["2027-01-01"], "source_names": {{"source_a": "EPM", "source_b": "ELITE"}}}}"#
        )
        .unwrap();

        let manager = ConfigManager::new(Some(temp_file.path().to_path_buf()));
        let settings = manager.load_settings().unwrap();
        assert_eq!(settings.calendar.holidays().count(), 1);
        assert_eq!(settings.source_names.source_a, "EPM");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let manager = ConfigManager::new(Some(PathBuf::from("no_such_config.json")));
        assert!(matches!(manager.load(), Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_malformed_json_reports_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{ not json").unwrap();

        let result = ConfigManager::load_from_file(temp_file.path());
        match result {
            Err(ConfigError::ParseError { path, .. }) => {
                assert_eq!(path, temp_file.path().display().to_string())
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
