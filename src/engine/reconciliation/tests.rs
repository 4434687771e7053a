use super::{is_valid_source_b, ReconciliationEngine, ReconciliationRules};
use crate::config::AnsConfig;
use crate::domain::inventory::InventoryLine;
use crate::domain::types::{MatchTag, ReconStatus, SourceTag, TOTAL_LABEL};

// ==========================================
// 测试辅助函数
// ==========================================

fn engine() -> ReconciliationEngine {
    let settings = AnsConfig::default().into_settings().unwrap();
    ReconciliationEngine::from_settings(&settings)
}

fn line_a(order_id: &str, code: &str, quantity: f64) -> InventoryLine {
    InventoryLine {
        row_number: 2,
        order_id: order_id.to_string(),
        item_code: code.to_string(),
        quantity,
        source: SourceTag::SourceA,
        attributes: vec![("municipio".to_string(), "MEDELLIN".to_string())],
    }
}

fn line_b(order_id: &str, code: &str, quantity: f64) -> InventoryLine {
    InventoryLine {
        row_number: 5,
        order_id: order_id.to_string(),
        item_code: code.to_string(),
        quantity,
        source: SourceTag::SourceB,
        attributes: Vec::new(),
    }
}

const ORDER: &str = "12345678";

// ==========================================
// B 侧过滤
// ==========================================

#[test]
fn test_source_b_format_rules() {
    assert!(is_valid_source_b(&line_b(ORDER, "200492", 1.0)));
    assert!(is_valid_source_b(&line_b("123456789012", "100001", 1.0)));
    assert!(!is_valid_source_b(&line_b(ORDER, "12", 1.0)));
    assert!(!is_valid_source_b(&line_b(ORDER, "200492A", 1.0)));
    assert!(!is_valid_source_b(&line_b("1234567", "200492", 1.0)));
    assert!(!is_valid_source_b(&line_b("1", "200492", 1.0)));
    assert!(!is_valid_source_b(&line_b("", "200492", 1.0)));
}

#[test]
fn test_short_code_in_source_b_never_reaches_output() {
    let engine = engine();
    let report = engine.reconcile(vec![line_a(ORDER, "100001", 1.0)], vec![line_b(ORDER, "12", 4.0)]);

    assert_eq!(report.discarded_source_b, 1);
    assert!(report.matched.iter().all(|r| r.item_code != "12"));
    assert!(report.unmatched.iter().all(|r| r.item_code != "12"));
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].status, ReconStatus::OnlyInA);
}

// ==========================================
// 外连接
// ==========================================

#[test]
fn test_outer_join_tags() {
    let engine = engine();
    let a = vec![line_a(ORDER, "100001", 2.0), line_a(ORDER, "100002", 1.0)];
    let b = vec![line_b(ORDER, "100001", 2.0), line_b(ORDER, "100003", 5.0)];

    let joined = engine.outer_join(&a, &b);
    let tags: Vec<MatchTag> = joined.iter().map(|r| r.tag).collect();
    assert_eq!(tags, vec![MatchTag::Both, MatchTag::AOnly, MatchTag::BOnly]);
    assert_eq!(joined[2].item_code(), "100003");
}

#[test]
fn test_outer_join_uses_equivalence_but_keeps_original_codes() {
    let engine = engine();
    let joined = engine.outer_join(
        &[line_a(ORDER, "200384", 1.0)],
        &[line_b(ORDER, "200384A", 1.0)],
    );

    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].tag, MatchTag::Both);
    assert_eq!(joined[0].code_equiv, "200384");
    assert_eq!(joined[0].a.as_ref().unwrap().item_code, "200384");
    assert_eq!(joined[0].b.as_ref().unwrap().item_code, "200384A");
}

#[test]
fn test_outer_join_duplicate_keys_expand() {
    let engine = engine();
    let a = vec![line_a(ORDER, "100001", 1.0), line_a(ORDER, "100001", 2.0)];
    let b = vec![line_b(ORDER, "100001", 3.0), line_b(ORDER, "100001", 4.0)];

    let joined = engine.outer_join(&a, &b);
    assert_eq!(joined.len(), 4);
    assert!(joined.iter().all(|r| r.tag == MatchTag::Both));
}

#[test]
fn test_outer_join_preserves_totals_for_unique_keys() {
    let engine = engine();
    let a = vec![
        line_a(ORDER, "100001", 2.0),
        line_a(ORDER, "200492", 1.5),
        line_a("87654321", "100001", 4.0),
    ];
    let b = vec![
        line_b(ORDER, "100001", 1.0),
        line_b(ORDER, "200492A", 3.0),
        line_b("11112222", "100005", 7.0),
    ];

    let joined = engine.outer_join(&a, &b);

    let total_a: f64 = joined
        .iter()
        .filter(|r| matches!(r.tag, MatchTag::Both | MatchTag::AOnly))
        .map(|r| r.qty_a())
        .sum();
    let total_b: f64 = joined
        .iter()
        .filter(|r| matches!(r.tag, MatchTag::Both | MatchTag::BOnly))
        .map(|r| r.qty_b())
        .sum();

    assert_eq!(total_a, a.iter().map(|l| l.quantity).sum::<f64>());
    assert_eq!(total_b, b.iter().map(|l| l.quantity).sum::<f64>());
}

// ==========================================
// 差值与状态
// ==========================================

#[test]
fn test_difference_status() {
    let engine = engine();
    let report = engine.reconcile(
        vec![
            line_a(ORDER, "100001", 2.0),
            line_a(ORDER, "100002", 3.0),
            line_a(ORDER, "100003", 1.0),
        ],
        vec![
            line_b(ORDER, "100001", 2.0),
            line_b(ORDER, "100002", 1.0),
            line_b(ORDER, "100003", 1.5),
        ],
    );

    let statuses: Vec<ReconStatus> = report.matched.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![ReconStatus::Ok, ReconStatus::ShortfallInB, ReconStatus::ExcessInB]
    );
    assert_eq!(report.matched[1].difference, 2.0);
    assert_eq!(report.matched[2].difference, -0.5);
    assert_eq!(report.matched[0].attributes[0].1, "MEDELLIN");
}

#[test]
fn test_zero_quantities_are_ok() {
    let engine = engine();
    let report = engine.reconcile(
        vec![line_a(ORDER, "100001", 0.0)],
        vec![line_b(ORDER, "100001", 0.0)],
    );
    assert_eq!(report.matched[0].status, ReconStatus::Ok);
}

// ==========================================
// 豁免代码
// ==========================================

#[test]
fn test_exempt_code_only_in_one_source_is_kept() {
    let engine = engine();
    let report = engine.reconcile(
        vec![line_a(ORDER, "200492A", 1.0), line_a(ORDER, "100001", 1.0)],
        Vec::new(),
    );

    assert_eq!(report.exempt_kept, 1);
    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].item_code, "200492A");
    assert_eq!(report.matched[0].status, ReconStatus::OkComplementary);
    assert_eq!(report.matched[0].difference, 0.0);
    assert!(report.unmatched.iter().all(|r| r.item_code != "200492A"));
    assert_eq!(report.unmatched.len(), 1);
}

#[test]
fn test_exempt_rows_keep_status_when_pair_not_covered() {
    // A: 200492A ×5 仅 A 侧 → 豁免保留; ΣB = 0 < ΣA, 不合并但状态不变
    let engine = engine();
    let report = engine.reconcile(vec![line_a(ORDER, "200492A", 5.0)], Vec::new());

    assert_eq!(report.pair_adjustments, 0);
    assert_eq!(report.matched[0].status, ReconStatus::OkComplementary);
}

// ==========================================
// 互补对合并
// ==========================================

#[test]
fn test_complementary_codes_consolidate_to_ok() {
    // A: 200492 ×2 + 200492A ×1, B: 200492 ×3 → 同一连接键,两行统一标记为互补物料
    let engine = engine();
    let report = engine.reconcile(
        vec![line_a(ORDER, "200492", 2.0), line_a(ORDER, "200492A", 1.0)],
        vec![line_b(ORDER, "200492", 3.0)],
    );

    assert_eq!(report.matched.len(), 2);
    assert!(report
        .matched
        .iter()
        .all(|r| r.status == ReconStatus::OkComplementary && r.difference == 0.0));
    assert_eq!(report.matched[0].item_code, "200492");
    assert_eq!(report.matched[1].item_code, "200492A");
    assert_eq!(report.matched[0].qty_a, 2.0);
    assert_eq!(report.matched[0].qty_b, 3.0);
    assert!(report.unmatched.is_empty());
    assert_eq!(report.pair_adjustments, 1);
}

#[test]
fn test_complement_code_in_source_b_is_noise() {
    // B 侧代码必须为 6 位数字,带后缀的互补代码在连接前即被丢弃。
    // 结果是 A 侧 200492 记为 "Solo en A",而不是与 B 侧 200492A 合并为互补物料。
    // 格式过滤先于代码归一化执行,不要调换两者顺序。
    let engine = engine();
    let report = engine.reconcile(
        vec![line_a(ORDER, "200492", 2.0)],
        vec![line_b(ORDER, "200492A", 3.0)],
    );

    assert_eq!(report.discarded_source_b, 1);
    assert!(report.matched.is_empty());
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].status, ReconStatus::OnlyInA);
}

#[test]
fn test_pair_consolidation_is_scoped_per_order() {
    // 两个工单的行交错输入: X 被 B 侧覆盖, Y 的 ΣB < ΣA
    let engine = engine();
    let report = engine.reconcile(
        vec![
            line_a("11110000", "200492", 2.0),
            line_a("22220000", "200492", 5.0),
            line_a("11110000", "200492A", 1.0),
            line_a("22220000", "200492A", 1.0),
        ],
        vec![line_b("22220000", "200492", 1.0), line_b("11110000", "200492", 3.0)],
    );

    assert_eq!(report.pair_adjustments, 1);

    let covered: Vec<_> = report
        .matched
        .iter()
        .filter(|r| r.order_id == "11110000")
        .collect();
    assert_eq!(covered.len(), 2);
    assert!(covered
        .iter()
        .all(|r| r.status == ReconStatus::OkComplementary && r.difference == 0.0));

    let short = report
        .matched
        .iter()
        .find(|r| r.order_id == "22220000" && r.item_code == "200492")
        .unwrap();
    assert_ne!(short.status, ReconStatus::OkComplementary);
    assert_ne!(short.difference, 0.0);
}

#[test]
fn test_pair_consolidation_applies_uniformly_and_clears_unmatched() {
    let engine = engine();
    let report = engine.reconcile(
        vec![
            line_a(ORDER, "200384", 2.0),
            line_a(ORDER, "200384A", 1.0),
            line_a(ORDER, "100001", 1.0),
        ],
        vec![line_b(ORDER, "200384", 4.0), line_b(ORDER, "100001", 1.0)],
    );

    // 200384 与 200384A 同键 → 均匹配到 B 的 200384
    let pair_rows: Vec<_> = report
        .matched
        .iter()
        .filter(|r| r.code_equiv == "200384")
        .collect();
    assert_eq!(pair_rows.len(), 2);
    assert!(pair_rows
        .iter()
        .all(|r| r.status == ReconStatus::OkComplementary && r.difference == 0.0));
    assert!(report.unmatched.is_empty());
}

#[test]
fn test_pair_not_consolidated_when_b_short() {
    let engine = engine();
    let report = engine.reconcile(
        vec![line_a(ORDER, "200492", 5.0)],
        vec![line_b(ORDER, "200492", 3.0)],
    );

    assert_eq!(report.pair_adjustments, 0);
    assert_eq!(report.matched[0].status, ReconStatus::ShortfallInB);
    assert_eq!(report.matched[0].difference, 2.0);
}

#[test]
fn test_pair_consolidation_removes_only_same_order_unmatched() {
    let engine = engine();
    let other_order = "99999999";
    let report = engine.reconcile(
        vec![line_a(ORDER, "200384", 1.0)],
        vec![
            line_b(ORDER, "200384", 1.0),
            line_b(other_order, "200384", 2.0),
        ],
    );

    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].order_id, other_order);
    assert_eq!(report.unmatched[0].status, ReconStatus::OnlyInB);
    assert_eq!(report.unmatched[0].qty_a, None);
    assert_eq!(report.unmatched[0].qty_b, Some(2.0));
}

#[test]
fn test_custom_pair_clears_unmatched_rows_of_consolidated_order() {
    // 无等价映射的自定义代码对: 两个代码分属不同连接键
    let rules = ReconciliationRules {
        complementary_pairs: vec![crate::config::ComplementaryPair::new("300001", "300002")],
        ..ReconciliationRules::default()
    };
    let engine = ReconciliationEngine::new(rules);

    let report = engine.reconcile(
        vec![line_a(ORDER, "300001", 2.0), line_a(ORDER, "300002", 1.0)],
        vec![line_b(ORDER, "300001", 4.0)],
    );

    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].status, ReconStatus::OkComplementary);
    assert_eq!(report.unmatched_removed, 1);
    assert!(report.unmatched.is_empty());
}

// ==========================================
// 汇总
// ==========================================

#[test]
fn test_summary_sorted_by_label_with_total() {
    let engine = engine();
    let report = engine.reconcile(
        vec![
            line_a(ORDER, "100001", 2.0),
            line_a(ORDER, "100002", 3.0),
            line_a(ORDER, "100003", 3.0),
        ],
        vec![
            line_b(ORDER, "100001", 2.0),
            line_b(ORDER, "100002", 1.0),
            line_b(ORDER, "100003", 1.0),
        ],
    );

    let labels: Vec<&str> = report.summary.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["FALTANTE EN ELITE", "OK", TOTAL_LABEL]);
    assert_eq!(report.summary[0].total, 2);
    assert_eq!(report.summary.last().unwrap().total, 3);
}

#[test]
fn test_empty_inputs() {
    let engine = engine();
    let report = engine.reconcile(Vec::new(), Vec::new());
    assert!(report.matched.is_empty());
    assert!(report.unmatched.is_empty());
    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].total, 0);
}
