// ==========================================
// 控制 ANS - 配置层
// ==========================================
// 职责: 静态配置加载（约定天数 / 节假日 / 代码等价 / 互补对）
// 存储: JSON 文件 + 内置默认值
// ==========================================

pub mod ans_config;
pub mod config_manager;
pub mod error;
pub mod tables;

// 重导出核心配置类型
pub use ans_config::{
    AgreedDaysRule, AnsConfig, AnsSettings, MAX_AGREED_DAYS, ZONE_RURAL, ZONE_URBAN,
};
pub use config_manager::{ConfigManager, CONFIG_PATH_ENV};
pub use error::{ConfigError, ConfigResult};
pub use tables::{AgreedDaysTable, CodeEquivalenceTable, ComplementaryPair};
