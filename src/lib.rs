// ==========================================
// 控制 ANS - 核心库
// ==========================================
// 职责: 工单 ANS 期限计算 + 仓储物料对账 + 工单清洗
// 技术栈: Rust + calamine / csv / rust_xlsxwriter
// 系统定位: 批处理工具（输入/输出均为表格文件）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 静态表与加载
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 报表输出
pub mod exporter;

// API 层 - 批处理入口
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 耗时统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MatchTag, ReconStatus, SlaStatus, SourceNames, SourceTag};

// 领域实体
pub use domain::{
    CleaningReport, EvaluatedWorkOrder, InventoryLine, ReconciliationReport, ReconciliationRow,
    SlaOutcome, UnmatchedRow, WorkOrderRecord,
};

// 配置
pub use config::{AnsConfig, AnsSettings, ConfigManager};

// 引擎
pub use engine::{BusinessCalendar, ReconciliationEngine, SlaEngine};

// API
pub use api::{AnsApi, CleaningApi, InventoryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Control ANS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "Control ANS");
    }
}
