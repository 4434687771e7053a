// ==========================================
// 控制 ANS - API 层
// ==========================================
// 职责: 批处理入口（导入 → 引擎 → 导出）,供命令行调用
// ==========================================

pub mod ans_api;
pub mod cleaning_api;
pub mod error;
pub mod inventory_api;

// 重导出核心类型
pub use ans_api::{AnsApi, AnsRunReport};
pub use cleaning_api::{CleaningApi, CleaningRunReport};
pub use error::{ApiError, ApiResult};
pub use inventory_api::{InventoryApi, InventoryRunReport};
