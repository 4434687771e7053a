// ==========================================
// 控制 ANS - 工单领域模型
// ==========================================
// 依据: ANS 计算规则 - WorkOrderRecord
// ==========================================

use crate::domain::types::SlaStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// WorkOrderRecord - 工单记录（导入层产出）
// ==========================================
// 用途: 导入层写入,引擎层只读
// 生命周期: 一次批处理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    pub row_number: usize,                 // 源文件行号（含表头，从 2 开始）
    pub order_id: String,                  // 工单号（PEDIDO）
    pub activity: String,                  // 作业代码（ACTIVIDAD，TRIM + UPPER）
    pub zone: String,                      // 地址类型（TIPO_DIRECCION: URBANO/RURAL）
    pub start: Option<NaiveDateTime>,      // ANS 开始时间（FECHA_INICIO_ANS）
    pub form_status: Option<String>,       // 技术员表单状态（可选，左连接结果）
    pub fields: Vec<(String, String)>,     // 原始列（按列顺序透传）
}

impl WorkOrderRecord {
    /// 读取透传列
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

// ==========================================
// SlaOutcome - ANS 计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaOutcome {
    pub agreed_days: u32,                  // 约定天数（0 = 未配置规则）
    pub deadline: Option<NaiveDateTime>,   // ANS 期限（保留开始时间的时分秒）
    pub elapsed: String,                   // 已用工作日标签 "<N> días HH:MM"
    pub remaining: String,                 // 剩余标签 "<N> días HH:MM" / "VENCIDO" / ""
    pub status: SlaStatus,                 // 状态
}

// ==========================================
// EvaluatedWorkOrder - 计算后的工单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedWorkOrder {
    pub record: WorkOrderRecord,
    pub outcome: SlaOutcome,
}

// ==========================================
// CleaningReport - 清洗汇总
// ==========================================
// 对齐: 清洗阶段 RESUMEN（总数 / 全空行 / 重复工单号）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub total_rows: usize,        // 源文件数据行数
    pub kept_rows: usize,         // 作业代码有效的行数
    pub discarded_activity: usize, // 作业代码无效而丢弃的行数
    pub empty_rows: usize,        // 所有字段均为空的行数
    pub duplicate_orders: usize,  // 重复工单号数（首次出现不计）
    pub unparsed_start: usize,    // 开始时间非空但无法解析的行数
}
