// ==========================================
// 控制 ANS - 仓储对账引擎
// ==========================================
// 依据: 仓储对账规则 - 过滤 / 等价归一 / 外连接 / 豁免 / 差值 / 互补对合并
// 红线: 数量比较为精确比较,不设容差
// 红线: 豁免代码不会出现在未匹配清单
// ==========================================
// 职责: A/B 两侧物料明细对账
// 输入: A 侧明细 + B 侧明细
// 输出: ReconciliationReport
// ==========================================

use crate::config::{AnsSettings, CodeEquivalenceTable, ComplementaryPair};
use crate::domain::inventory::{
    InventoryLine, JoinedRow, ReconciliationReport, ReconciliationRow, UnmatchedRow,
};
use crate::domain::types::{MatchTag, ReconStatus, SourceNames, SummaryLine, TOTAL_LABEL};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;
use tracing::instrument;

#[cfg(test)]
mod tests;

// ==========================================
// B 侧格式校验
// ==========================================

fn order_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8,}$").expect("order id regex"))
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{6}$").expect("item code regex"))
}

/// B 侧行是否有效: 工单号 8 位以上数字 且 物料代码 6 位数字
pub fn is_valid_source_b(line: &InventoryLine) -> bool {
    order_pattern().is_match(&line.order_id) && code_pattern().is_match(&line.item_code)
}

// ==========================================
// ReconciliationRules - 对账规则集
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReconciliationRules {
    pub equivalences: CodeEquivalenceTable,
    pub complementary_pairs: Vec<ComplementaryPair>,
    pub exempt_codes: BTreeSet<String>,
    pub source_names: SourceNames,
}

impl ReconciliationRules {
    pub fn from_settings(settings: &AnsSettings) -> Self {
        Self {
            equivalences: settings.equivalences.clone(),
            complementary_pairs: settings.complementary_pairs.clone(),
            exempt_codes: settings.exempt_codes.clone(),
            source_names: settings.source_names.clone(),
        }
    }
}

// ==========================================
// ReconciliationEngine - 对账引擎
// ==========================================
pub struct ReconciliationEngine {
    rules: ReconciliationRules,
}

impl ReconciliationEngine {
    /// 创建新的对账引擎
    pub fn new(rules: ReconciliationRules) -> Self {
        Self { rules }
    }

    pub fn from_settings(settings: &AnsSettings) -> Self {
        Self::new(ReconciliationRules::from_settings(settings))
    }

    pub fn rules(&self) -> &ReconciliationRules {
        &self.rules
    }

    // ==========================================
    // 主流程
    // ==========================================

    /// 执行对账
    ///
    /// 流程: 过滤 B → 外连接 → 豁免 → 差值判定 → 互补对合并 → 未匹配标记 → 汇总
    #[instrument(skip(self, source_a, source_b), fields(a = source_a.len(), b = source_b.len()))]
    pub fn reconcile(
        &self,
        source_a: Vec<InventoryLine>,
        source_b: Vec<InventoryLine>,
    ) -> ReconciliationReport {
        let (source_b, discarded_source_b) = self.filter_source_b(source_b);
        let joined = self.outer_join(&source_a, &source_b);

        // 1. BOTH → 差值判定; 单侧行中的豁免代码 → 保留在匹配集
        let mut matched = Vec::new();
        let mut exempt = Vec::new();
        let mut pending = Vec::new();
        for row in joined {
            if row.tag == MatchTag::Both {
                let difference = row.qty_a() - row.qty_b();
                matched.push(to_reconciliation_row(
                    &row,
                    difference,
                    ReconStatus::from_difference(difference),
                ));
            } else if self.rules.exempt_codes.contains(row.item_code()) {
                exempt.push(to_reconciliation_row(&row, 0.0, ReconStatus::OkComplementary));
            } else {
                pending.push(row);
            }
        }
        let exempt_kept = exempt.len();
        matched.extend(exempt);

        // 2. 互补对合并
        let consolidated = self.consolidate_pairs(&mut matched);
        let pair_adjustments = consolidated.len();

        let before = pending.len();
        pending.retain(|row| {
            !self.rules.complementary_pairs.iter().enumerate().any(|(idx, pair)| {
                consolidated.contains(&(row.order_id.clone(), idx)) && pair.contains(row.item_code())
            })
        });
        let unmatched_removed = before - pending.len();

        // 3. 剩余单侧行
        let unmatched: Vec<UnmatchedRow> = pending.iter().map(to_unmatched_row).collect();

        let summary = self.summarize(&matched);

        tracing::info!(
            matched = matched.len(),
            unmatched = unmatched.len(),
            exempt_kept,
            pair_adjustments,
            unmatched_removed,
            discarded_source_b,
            "对账完成"
        );

        ReconciliationReport {
            matched,
            unmatched,
            summary,
            discarded_source_b,
            exempt_kept,
            pair_adjustments,
            unmatched_removed,
        }
    }

    // ==========================================
    // 步骤实现
    // ==========================================

    /// 过滤 B 侧噪声行
    ///
    /// # 返回
    /// (有效行, 丢弃行数)
    pub fn filter_source_b(&self, lines: Vec<InventoryLine>) -> (Vec<InventoryLine>, usize) {
        let total = lines.len();
        let kept: Vec<InventoryLine> = lines
            .into_iter()
            .filter(|line| {
                let valid = is_valid_source_b(line);
                if !valid {
                    tracing::debug!(
                        row = line.row_number,
                        order_id = %line.order_id,
                        item_code = %line.item_code,
                        "丢弃 B 侧噪声行"
                    );
                }
                valid
            })
            .collect();
        let discarded = total - kept.len();
        (kept, discarded)
    }

    /// 连接键（等价表归一,未映射原样返回）
    pub fn code_equiv(&self, code: &str) -> String {
        self.rules.equivalences.normalize(code).to_string()
    }

    /// 按 (工单号, 连接键) 全外连接
    ///
    /// 同键多行按关系连接展开（笛卡尔积）。输出顺序: 按 A 侧输入顺序,
    /// 随后为 B 侧独有行（按 B 侧输入顺序）。
    pub fn outer_join(&self, source_a: &[InventoryLine], source_b: &[InventoryLine]) -> Vec<JoinedRow> {
        let mut b_index: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for (idx, line) in source_b.iter().enumerate() {
            b_index
                .entry((line.order_id.clone(), self.code_equiv(&line.item_code)))
                .or_default()
                .push(idx);
        }

        let mut joined = Vec::new();
        let mut a_keys: HashSet<(String, String)> = HashSet::new();

        for line in source_a {
            let key = (line.order_id.clone(), self.code_equiv(&line.item_code));
            match b_index.get(&key) {
                Some(b_rows) => {
                    for &b_idx in b_rows {
                        joined.push(JoinedRow {
                            order_id: key.0.clone(),
                            code_equiv: key.1.clone(),
                            a: Some(line.clone()),
                            b: Some(source_b[b_idx].clone()),
                            tag: MatchTag::Both,
                        });
                    }
                }
                None => joined.push(JoinedRow {
                    order_id: key.0.clone(),
                    code_equiv: key.1.clone(),
                    a: Some(line.clone()),
                    b: None,
                    tag: MatchTag::AOnly,
                }),
            }
            a_keys.insert(key);
        }

        for line in source_b {
            let key = (line.order_id.clone(), self.code_equiv(&line.item_code));
            if !a_keys.contains(&key) {
                joined.push(JoinedRow {
                    order_id: key.0,
                    code_equiv: key.1,
                    a: None,
                    b: Some(line.clone()),
                    tag: MatchTag::BOnly,
                });
            }
        }

        joined
    }

    /// 互补对合并
    ///
    /// 按工单 × 代码对汇总匹配集数量: ΣB ≥ ΣA 且 ΣA > 0 时,
    /// 该工单内两种代码的所有行统一标记为互补物料,差值归 0。
    ///
    /// # 返回
    /// 已合并的 (工单号, 代码对下标)
    fn consolidate_pairs(&self, matched: &mut [ReconciliationRow]) -> HashSet<(String, usize)> {
        // 工单 → 行下标（按首次出现顺序）
        let mut orders: Vec<(String, Vec<usize>)> = Vec::new();
        let mut order_slot: HashMap<String, usize> = HashMap::new();
        for (idx, row) in matched.iter().enumerate() {
            let slot = *order_slot.entry(row.order_id.clone()).or_insert_with(|| {
                orders.push((row.order_id.clone(), Vec::new()));
                orders.len() - 1
            });
            orders[slot].1.push(idx);
        }

        let mut consolidated = HashSet::new();
        for (order_id, rows) in &orders {
            for (pair_idx, pair) in self.rules.complementary_pairs.iter().enumerate() {
                let members: Vec<usize> = rows
                    .iter()
                    .copied()
                    .filter(|&idx| pair.contains(&matched[idx].item_code))
                    .collect();
                if members.is_empty() {
                    continue;
                }

                let total_a: f64 = members.iter().map(|&idx| matched[idx].qty_a).sum();
                let total_b: f64 = members.iter().map(|&idx| matched[idx].qty_b).sum();

                if total_b >= total_a && total_a > 0.0 {
                    for &idx in &members {
                        matched[idx].status = ReconStatus::OkComplementary;
                        matched[idx].difference = 0.0;
                    }
                    tracing::debug!(
                        order_id = %order_id,
                        base = %pair.base,
                        complement = %pair.complement,
                        total_a,
                        total_b,
                        "互补对合并"
                    );
                    consolidated.insert((order_id.clone(), pair_idx));
                }
            }
        }

        consolidated
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 匹配集按状态标签汇总（标签升序）+ TOTAL GENERAL
    pub fn summarize(&self, matched: &[ReconciliationRow]) -> Vec<SummaryLine> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in matched {
            *counts
                .entry(row.status.label(&self.rules.source_names))
                .or_insert(0) += 1;
        }

        let mut lines: Vec<SummaryLine> = counts
            .into_iter()
            .map(|(label, total)| SummaryLine { label, total })
            .collect();
        lines.push(SummaryLine {
            label: TOTAL_LABEL.to_string(),
            total: matched.len(),
        });
        lines
    }
}

fn to_reconciliation_row(row: &JoinedRow, difference: f64, status: ReconStatus) -> ReconciliationRow {
    ReconciliationRow {
        order_id: row.order_id.clone(),
        item_code: row.item_code().to_string(),
        code_equiv: row.code_equiv.clone(),
        attributes: row
            .a
            .as_ref()
            .map(|line| line.attributes.clone())
            .unwrap_or_default(),
        qty_a: row.qty_a(),
        qty_b: row.qty_b(),
        difference,
        status,
    }
}

fn to_unmatched_row(row: &JoinedRow) -> UnmatchedRow {
    UnmatchedRow {
        order_id: row.order_id.clone(),
        item_code: row.item_code().to_string(),
        qty_a: row.a.as_ref().map(|line| line.quantity),
        qty_b: row.b.as_ref().map(|line| line.quantity),
        status: match row.tag {
            MatchTag::BOnly => ReconStatus::OnlyInB,
            _ => ReconStatus::OnlyInA,
        },
    }
}
