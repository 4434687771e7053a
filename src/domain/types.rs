// ==========================================
// 控制 ANS - 领域类型定义
// ==========================================
// 依据: ANS 计算规则 - 状态体系
// 依据: 仓储对账规则 - 匹配标记与对账状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ANS 状态 (SLA Status)
// ==========================================
// 红线: 每个 (now, deadline) 组合恰好映射到一个状态
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlaStatus {
    #[serde(rename = "SIN_FECHA")]
    SinFecha, // 无日期（缺少开始时间或期限）
    #[serde(rename = "VENCIDO")]
    Vencido, // 已逾期
    #[serde(rename = "ALERTA_0")]
    Alerta0, // 当天到期
    #[serde(rename = "ALERTA")]
    Alerta, // 剩余 1-2 个工作日
    #[serde(rename = "A_TIEMPO")]
    ATiempo, // 正常
}

impl SlaStatus {
    /// 全部状态（按严重程度排列）
    pub const ALL: [SlaStatus; 5] = [
        SlaStatus::Vencido,
        SlaStatus::Alerta0,
        SlaStatus::Alerta,
        SlaStatus::ATiempo,
        SlaStatus::SinFecha,
    ];

    /// 报表中使用的文字标签（与业务表格保持一致）
    pub fn label(&self) -> &'static str {
        match self {
            SlaStatus::SinFecha => "SIN FECHA",
            SlaStatus::Vencido => "VENCIDO",
            SlaStatus::Alerta0 => "ALERTA_0 Días",
            SlaStatus::Alerta => "ALERTA",
            SlaStatus::ATiempo => "A TIEMPO",
        }
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaStatus::SinFecha => write!(f, "SIN_FECHA"),
            SlaStatus::Vencido => write!(f, "VENCIDO"),
            SlaStatus::Alerta0 => write!(f, "ALERTA_0"),
            SlaStatus::Alerta => write!(f, "ALERTA"),
            SlaStatus::ATiempo => write!(f, "A_TIEMPO"),
        }
    }
}

// ==========================================
// 数据来源标记 (Source Tag)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTag {
    SourceA, // 系统导出（FÉNIX）
    SourceB, // 内部消耗表（ELITE）
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::SourceA => write!(f, "SOURCE_A"),
            SourceTag::SourceB => write!(f, "SOURCE_B"),
        }
    }
}

// ==========================================
// 外连接匹配标记 (Match Tag)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchTag {
    Both,  // 两侧均存在
    AOnly, // 仅 A 侧
    BOnly, // 仅 B 侧
}

impl fmt::Display for MatchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTag::Both => write!(f, "BOTH"),
            MatchTag::AOnly => write!(f, "A_ONLY"),
            MatchTag::BOnly => write!(f, "B_ONLY"),
        }
    }
}

// ==========================================
// 对账状态 (Reconciliation Status)
// ==========================================
// 标签依赖来源名称（如 "FALTANTE EN ELITE"），见 label()
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconStatus {
    Ok,              // 数量一致
    ShortfallInB,    // B 侧短缺（diff > 0）
    ExcessInB,       // B 侧超出（diff < 0）
    OkComplementary, // 互补物料视为一致
    OnlyInA,         // 仅在 A 侧
    OnlyInB,         // 仅在 B 侧
}

impl ReconStatus {
    /// 按差值判定状态（精确比较，不设容差）
    pub fn from_difference(difference: f64) -> Self {
        if difference == 0.0 {
            ReconStatus::Ok
        } else if difference > 0.0 {
            ReconStatus::ShortfallInB
        } else {
            ReconStatus::ExcessInB
        }
    }

    /// 报表标签
    pub fn label(&self, names: &SourceNames) -> String {
        match self {
            ReconStatus::Ok => "OK".to_string(),
            ReconStatus::ShortfallInB => format!("FALTANTE EN {}", names.source_b),
            ReconStatus::ExcessInB => format!("EXCESO EN {}", names.source_b),
            ReconStatus::OkComplementary => "OK – Material Complementario".to_string(),
            ReconStatus::OnlyInA => format!("Solo en {}", names.source_a),
            ReconStatus::OnlyInB => format!("Solo en {}", names.source_b),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ReconStatus::Ok | ReconStatus::OkComplementary)
    }
}

impl fmt::Display for ReconStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconStatus::Ok => write!(f, "OK"),
            ReconStatus::ShortfallInB => write!(f, "SHORTFALL_IN_B"),
            ReconStatus::ExcessInB => write!(f, "EXCESS_IN_B"),
            ReconStatus::OkComplementary => write!(f, "OK_COMPLEMENTARY"),
            ReconStatus::OnlyInA => write!(f, "ONLY_IN_A"),
            ReconStatus::OnlyInB => write!(f, "ONLY_IN_B"),
        }
    }
}

// ==========================================
// 来源名称 (用于报表标签)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNames {
    pub source_a: String, // 默认 FENIX
    pub source_b: String, // 默认 ELITE
}

impl Default for SourceNames {
    fn default() -> Self {
        Self {
            source_a: "FENIX".to_string(),
            source_b: "ELITE".to_string(),
        }
    }
}

// ==========================================
// 汇总行 (Summary Line)
// ==========================================
// 用途: RESUMEN 工作表（状态 → 数量）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub label: String, // 状态标签
    pub total: usize,  // 数量
}

/// 汇总表的合计行标签
pub const TOTAL_LABEL: &str = "TOTAL GENERAL";
