// ==========================================
// 控制 ANS - 配置层错误类型
// ==========================================
// 红线: 配置错误在加载阶段即中止批处理
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    // ===== 日历配置错误 =====
    #[error("节假日格式错误: {value}（期望 YYYY-MM-DD）")]
    InvalidHoliday { value: String },

    // ===== 约定天数配置错误 =====
    #[error("约定天数规则缺少作业代码 (第 {0} 条)")]
    EmptyActivity(usize),

    #[error("约定天数规则重复: {0}")]
    DuplicateActivity(String),

    #[error("约定天数规则缺少地址类型: activity={0}")]
    EmptyZone(String),

    #[error("约定天数超出范围: activity={activity}, zone={zone}, days={days}（上限 {max}）")]
    InvalidDays {
        activity: String,
        zone: String,
        days: u32,
        max: u32,
    },

    // ===== 物料代码配置错误 =====
    #[error("代码等价表存在链式映射: {code} → {target}（目标代码本身也被映射）")]
    EquivalenceChain { code: String, target: String },

    #[error("代码等价表存在空代码: {0}")]
    EmptyCode(String),

    #[error("互补代码对无效: base={base}, complement={complement}")]
    InvalidPair { base: String, complement: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
