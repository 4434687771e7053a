// ==========================================
// 控制 ANS - 仓储对账领域模型
// ==========================================
// 依据: 仓储对账规则 - InventoryLine / ReconciliationRow
// ==========================================

use crate::domain::types::{MatchTag, ReconStatus, SourceTag, SummaryLine};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryLine - 物料明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub row_number: usize,              // 源文件行号
    pub order_id: String,               // 工单号
    pub item_code: String,              // 物料代码（原始值）
    pub quantity: f64,                  // 数量（非数值视为 0）
    pub source: SourceTag,              // 来源
    pub attributes: Vec<(String, String)>, // 描述性列（仅 A 侧输出）
}

// ==========================================
// JoinedRow - 外连接结果行
// ==========================================
// 用途: 对账中间产物（连接 → 分类 → 调整）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub order_id: String,
    pub code_equiv: String,             // 归一化连接键
    pub a: Option<InventoryLine>,
    pub b: Option<InventoryLine>,
    pub tag: MatchTag,
}

impl JoinedRow {
    /// 展示用物料代码: A 侧原始代码优先,否则取 B 侧原始代码
    pub fn item_code(&self) -> &str {
        self.a
            .as_ref()
            .or(self.b.as_ref())
            .map(|line| line.item_code.as_str())
            .unwrap_or(self.code_equiv.as_str())
    }

    pub fn qty_a(&self) -> f64 {
        self.a.as_ref().map(|line| line.quantity).unwrap_or(0.0)
    }

    pub fn qty_b(&self) -> f64 {
        self.b.as_ref().map(|line| line.quantity).unwrap_or(0.0)
    }
}

// ==========================================
// ReconciliationRow - 对账明细（CONTROL_ALMACEN）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub order_id: String,
    pub item_code: String,              // 展示用物料代码（保留原始代码）
    pub code_equiv: String,             // 归一化连接键
    pub attributes: Vec<(String, String)>, // A 侧描述性列
    pub qty_a: f64,
    pub qty_b: f64,
    pub difference: f64,                // qty_a - qty_b
    pub status: ReconStatus,
}

// ==========================================
// UnmatchedRow - 未匹配明细（NO_COINCIDEN）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedRow {
    pub order_id: String,
    pub item_code: String,
    pub qty_a: Option<f64>,
    pub qty_b: Option<f64>,
    pub status: ReconStatus,            // OnlyInA / OnlyInB
}

// ==========================================
// ReconciliationReport - 对账结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub matched: Vec<ReconciliationRow>,
    pub unmatched: Vec<UnmatchedRow>,
    pub summary: Vec<SummaryLine>,      // 按状态汇总 + TOTAL GENERAL
    pub discarded_source_b: usize,      // B 侧噪声行（工单号/代码格式不合法）
    pub exempt_kept: usize,             // 豁免代码保留数
    pub pair_adjustments: usize,        // 互补对调整次数（工单 × 代码对）
    pub unmatched_removed: usize,       // 因互补对调整移出未匹配的行数
}
