// ==========================================
// 控制 ANS - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不做文件 I/O
// 红线: 引擎为纯函数,当前时间由调用方注入
// ==========================================

pub mod calendar;
pub mod reconciliation;
pub mod sla;

// 重导出核心引擎
pub use calendar::BusinessCalendar;
pub use reconciliation::{is_valid_source_b, ReconciliationEngine, ReconciliationRules};
pub use sla::{status_from_remaining, SlaEngine, OVERDUE_LABEL};
