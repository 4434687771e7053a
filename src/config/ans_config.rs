// ==========================================
// 控制 ANS - 配置项全集
// ==========================================
// 职责: 配置文件结构 + 内置默认值 + 加载期校验
// 存储: JSON 文件（可选，缺省使用内置默认值）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::tables::{AgreedDaysTable, CodeEquivalenceTable, ComplementaryPair};
use crate::domain::types::SourceNames;
use crate::engine::calendar::BusinessCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

// ==========================================
// 内置默认值
// ==========================================

/// 节假日（哥伦比亚 2025/2026）
const DEFAULT_HOLIDAYS: [&str; 35] = [
    "2025-01-01", "2025-01-06", "2025-03-24", "2025-04-17", "2025-04-18",
    "2025-05-01", "2025-05-26", "2025-06-16", "2025-06-23", "2025-07-07",
    "2025-08-07", "2025-08-18", "2025-10-13", "2025-11-03", "2025-11-17",
    "2025-12-08", "2025-12-25",
    "2026-01-01", "2026-01-12", "2026-03-23", "2026-04-02", "2026-04-03",
    "2026-05-01", "2026-05-18", "2026-06-08", "2026-06-15", "2026-06-29",
    "2026-07-20", "2026-08-07", "2026-08-17", "2026-10-12", "2026-11-02",
    "2026-11-16", "2026-12-08", "2026-12-25",
];

/// 约定天数: (作业代码, 描述, 城区, 农村)
const DEFAULT_AGREED_DAYS: [(&str, &str, u32, u32); 10] = [
    ("ACREV", "PUNTOS DE CONEXIÓN", 4, 4),
    ("ALEGN", "LEGALIZACION", 7, 10),
    ("ALEGA", "LEGALIZACION", 7, 10),
    ("ACAMN", "REFORMA", 7, 10),
    ("AMRTR", "MOVIMIENTO REDES", 7, 10),
    ("REEQU", "TRABAJO ENERGÍA PREPAGO", 11, 11),
    ("INPRE", "INSTALACIÓN", 11, 11),
    ("DIPRE", "DESINSTALAR", 11, 11),
    ("ARTER", "REPLANTEO", 5, 8),
    ("AEJDO", "EJECUCIÓN", 5, 8),
];

/// 清洗阶段保留的作业代码
const DEFAULT_VALID_ACTIVITIES: [&str; 12] = [
    "ACREV", "ALEGN", "ALEGA", "ALEMN", "ACAMN", "AMRTR", "APLIN", "REEQU", "INPRE", "DIPRE",
    "ARTER", "AEJDO",
];

/// B 侧工作簿中跳过的工作表（小写）
const DEFAULT_EXCLUDED_SHEETS: [&str; 5] = ["pasos", "resumen", "hoja1", "macro", "configuracion"];

pub const ZONE_URBAN: &str = "URBANO";
pub const ZONE_RURAL: &str = "RURAL";

/// 约定天数上限（工作日）
pub const MAX_AGREED_DAYS: u32 = 3650;

// ==========================================
// AgreedDaysRule - 单条约定天数规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreedDaysRule {
    pub activity: String,
    #[serde(default)]
    pub description: String,
    pub days: BTreeMap<String, u32>, // 地址类型 → 天数
}

// ==========================================
// AnsConfig - 配置文件结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsConfig {
    pub holidays: Vec<String>,
    pub agreed_days: Vec<AgreedDaysRule>,
    pub valid_activities: Vec<String>,
    pub code_equivalences: BTreeMap<String, String>,
    pub complementary_pairs: Vec<ComplementaryPair>,
    pub exempt_codes: Vec<String>,
    pub source_names: SourceNames,
    pub source_b_excluded_sheets: Vec<String>,
}

impl Default for AnsConfig {
    fn default() -> Self {
        Self {
            holidays: DEFAULT_HOLIDAYS.iter().map(|s| s.to_string()).collect(),
            agreed_days: DEFAULT_AGREED_DAYS
                .iter()
                .map(|(activity, description, urban, rural)| AgreedDaysRule {
                    activity: activity.to_string(),
                    description: description.to_string(),
                    days: BTreeMap::from([
                        (ZONE_URBAN.to_string(), *urban),
                        (ZONE_RURAL.to_string(), *rural),
                    ]),
                })
                .collect(),
            valid_activities: DEFAULT_VALID_ACTIVITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            code_equivalences: BTreeMap::from([
                ("200492A".to_string(), "200492".to_string()),
                ("200384A".to_string(), "200384".to_string()),
            ]),
            complementary_pairs: vec![
                ComplementaryPair::new("200492", "200492A"),
                ComplementaryPair::new("200384", "200384A"),
            ],
            exempt_codes: vec!["200492A".to_string()],
            source_names: SourceNames::default(),
            source_b_excluded_sheets: DEFAULT_EXCLUDED_SHEETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ==========================================
// AnsSettings - 运行期只读配置
// ==========================================
#[derive(Debug, Clone)]
pub struct AnsSettings {
    pub calendar: BusinessCalendar,
    pub agreed_days: AgreedDaysTable,
    pub agreed_days_rules: Vec<AgreedDaysRule>, // 保留原始规则（CONFIG_DIAS_PACTADOS 输出）
    pub valid_activities: BTreeSet<String>,
    pub equivalences: CodeEquivalenceTable,
    pub complementary_pairs: Vec<ComplementaryPair>,
    pub exempt_codes: BTreeSet<String>,
    pub source_names: SourceNames,
    pub source_b_excluded_sheets: Vec<String>,
}

impl AnsConfig {
    /// 校验并构建运行期配置
    ///
    /// # 错误
    /// - 节假日格式错误
    /// - 约定天数规则缺少作业代码/地址类型、作业代码重复
    /// - 等价表存在空代码或链式映射
    /// - 互补代码对为空或两端相同
    pub fn into_settings(self) -> ConfigResult<AnsSettings> {
        let calendar = self.build_calendar()?;
        let agreed_days = self.build_agreed_days()?;
        let equivalences = self.build_equivalences()?;

        for pair in &self.complementary_pairs {
            let base = pair.base.trim();
            let complement = pair.complement.trim();
            if base.is_empty() || complement.is_empty() || base == complement {
                return Err(ConfigError::InvalidPair {
                    base: pair.base.clone(),
                    complement: pair.complement.clone(),
                });
            }
        }

        Ok(AnsSettings {
            calendar,
            agreed_days,
            agreed_days_rules: self.agreed_days,
            valid_activities: self
                .valid_activities
                .iter()
                .map(|a| a.trim().to_uppercase())
                .filter(|a| !a.is_empty())
                .collect(),
            equivalences,
            complementary_pairs: self
                .complementary_pairs
                .iter()
                .map(|p| ComplementaryPair::new(p.base.trim(), p.complement.trim()))
                .collect(),
            exempt_codes: self
                .exempt_codes
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            source_names: self.source_names,
            source_b_excluded_sheets: self
                .source_b_excluded_sheets
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
        })
    }

    fn build_calendar(&self) -> ConfigResult<BusinessCalendar> {
        let holidays = self
            .holidays
            .iter()
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidHoliday { value: raw.clone() })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(BusinessCalendar::new(holidays))
    }

    fn build_agreed_days(&self) -> ConfigResult<AgreedDaysTable> {
        let mut seen = HashSet::new();
        let mut table = AgreedDaysTable::new();

        for (idx, rule) in self.agreed_days.iter().enumerate() {
            let activity = rule.activity.trim().to_uppercase();
            if activity.is_empty() {
                return Err(ConfigError::EmptyActivity(idx + 1));
            }
            if !seen.insert(activity.clone()) {
                return Err(ConfigError::DuplicateActivity(activity));
            }
            for (zone, days) in &rule.days {
                if zone.trim().is_empty() {
                    return Err(ConfigError::EmptyZone(activity));
                }
                if *days > MAX_AGREED_DAYS {
                    return Err(ConfigError::InvalidDays {
                        activity,
                        zone: zone.clone(),
                        days: *days,
                        max: MAX_AGREED_DAYS,
                    });
                }
                table.insert(&activity, zone, *days);
            }
        }

        Ok(table)
    }

    fn build_equivalences(&self) -> ConfigResult<CodeEquivalenceTable> {
        let mut map = BTreeMap::new();
        for (code, target) in &self.code_equivalences {
            let code = code.trim();
            let target = target.trim();
            if code.is_empty() || target.is_empty() {
                return Err(ConfigError::EmptyCode(format!("{} → {}", code, target)));
            }
            map.insert(code.to_string(), target.to_string());
        }

        for (code, target) in &map {
            if map.contains_key(target) && target != code {
                return Err(ConfigError::EquivalenceChain {
                    code: code.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(CodeEquivalenceTable::new(map))
    }
}
