// ==========================================
// 控制 ANS - 静态配置表
// ==========================================
// 依据: ANS 计算规则 - AgreedDaysTable
// 依据: 仓储对账规则 - CodeEquivalenceTable / 互补代码对
// ==========================================
// 红线: 加载后只读,批处理期间不可变
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// AgreedDaysTable - 约定天数表
// ==========================================
// 键: (作业代码, 地址类型)，均为 TRIM + UPPER
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgreedDaysTable {
    days: HashMap<(String, String), u32>,
}

impl AgreedDaysTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加规则（覆盖同键旧值）
    pub fn insert(&mut self, activity: &str, zone: &str, days: u32) {
        self.days
            .insert((normalize_key(activity), normalize_key(zone)), days);
    }

    /// 查询约定天数
    ///
    /// 未配置规则返回 0（下游视为"无期限"）
    pub fn lookup(&self, activity: &str, zone: &str) -> u32 {
        self.days
            .get(&(normalize_key(activity), normalize_key(zone)))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str, u32)> for AgreedDaysTable {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str, u32)>>(iter: T) -> Self {
        let mut table = AgreedDaysTable::new();
        for (activity, zone, days) in iter {
            table.insert(activity, zone, days);
        }
        table
    }
}

// ==========================================
// CodeEquivalenceTable - 代码等价表
// ==========================================
// 互补代码 → 基础代码，仅用于生成连接键
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEquivalenceTable {
    map: BTreeMap<String, String>,
}

impl CodeEquivalenceTable {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self { map }
    }

    /// 归一化连接键（未映射的代码原样返回）
    pub fn normalize<'a>(&'a self, code: &'a str) -> &'a str {
        self.map.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.map.iter()
    }
}

// ==========================================
// ComplementaryPair - 互补代码对
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplementaryPair {
    pub base: String,       // 基础代码（如 200492）
    pub complement: String, // 互补代码（如 200492A）
}

impl ComplementaryPair {
    pub fn new(base: &str, complement: &str) -> Self {
        Self {
            base: base.to_string(),
            complement: complement.to_string(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.base == code || self.complement == code
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreed_days_lookup_is_trimmed_and_case_insensitive() {
        let table: AgreedDaysTable = vec![("ACREV", "URBANO", 4), ("ALEGN", "RURAL", 10)]
            .into_iter()
            .collect();
        assert_eq!(table.lookup(" acrev ", "urbano"), 4);
        assert_eq!(table.lookup("ALEGN", "RURAL "), 10);
    }

    #[test]
    fn test_agreed_days_missing_rule_is_zero() {
        let table: AgreedDaysTable = vec![("ACREV", "URBANO", 4)].into_iter().collect();
        assert_eq!(table.lookup("ACREV", "RURAL"), 0);
        assert_eq!(table.lookup("XXXXX", "URBANO"), 0);
    }

    #[test]
    fn test_equivalence_passthrough() {
        let mut map = BTreeMap::new();
        map.insert("200492A".to_string(), "200492".to_string());
        let table = CodeEquivalenceTable::new(map);
        assert_eq!(table.normalize("200492A"), "200492");
        assert_eq!(table.normalize("200492"), "200492");
        assert_eq!(table.normalize("123456"), "123456");
    }
}
