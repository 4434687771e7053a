// ==========================================
// 控制 ANS - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod inventory;
pub mod types;
pub mod work_order;

// 重导出核心类型
pub use inventory::{
    InventoryLine, JoinedRow, ReconciliationReport, ReconciliationRow, UnmatchedRow,
};
pub use types::{
    MatchTag, ReconStatus, SlaStatus, SourceNames, SourceTag, SummaryLine, TOTAL_LABEL,
};
pub use work_order::{CleaningReport, EvaluatedWorkOrder, SlaOutcome, WorkOrderRecord};
