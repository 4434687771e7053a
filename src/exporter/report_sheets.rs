// ==========================================
// 控制 ANS - 报表工作表构建
// ==========================================
// 职责: 领域结果 → SheetData
// - ANS:    FENIX_ANS / RESUMEN / CONFIG_DIAS_PACTADOS / META_INFO
// - 对账:   CONTROL_ALMACEN / RESUMEN / NO_COINCIDEN
// - 清洗:   FENIX_CLEAN / RESUMEN
// ==========================================
// 红线: 时间戳以 ISO 文本输出（下游报表按文本读取,避免时区/AM-PM 偏差）
// ==========================================

use crate::config::{AgreedDaysRule, ZONE_RURAL, ZONE_URBAN};
use crate::domain::inventory::{ReconciliationReport, ReconciliationRow};
use crate::domain::types::{SourceNames, SummaryLine};
use crate::domain::work_order::{CleaningReport, EvaluatedWorkOrder};
use crate::exporter::sheet::{CellValue, SheetData};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::COL_START;
use crate::importer::raw_table::RawTable;
use chrono::NaiveDateTime;

// ==========================================
// 工作表名称
// ==========================================
pub const SHEET_ANS: &str = "FENIX_ANS";
pub const SHEET_SUMMARY: &str = "RESUMEN";
pub const SHEET_AGREED_DAYS: &str = "CONFIG_DIAS_PACTADOS";
pub const SHEET_META: &str = "META_INFO";
pub const SHEET_CONTROL: &str = "CONTROL_ALMACEN";
pub const SHEET_UNMATCHED: &str = "NO_COINCIDEN";
pub const SHEET_CLEAN: &str = "FENIX_CLEAN";

// ==========================================
// ANS 派生列
// ==========================================
pub const COL_AGREED_DAYS: &str = "DIAS_PACTADOS";
pub const COL_DEADLINE: &str = "FECHA_LIMITE_ANS";
pub const COL_ELAPSED: &str = "DIAS_TRANSCURRIDOS";
pub const COL_REMAINING: &str = "DIAS_RESTANTES";
pub const COL_STATUS: &str = "ESTADO";
pub const COL_FORM_STATUS: &str = "FORMULARIO_FENIX";

/// 派生列（输入中同名列不透传,由计算结果覆盖）
pub const DERIVED_COLUMNS: [&str; 6] = [
    COL_AGREED_DAYS,
    COL_DEADLINE,
    COL_ELAPSED,
    COL_REMAINING,
    COL_STATUS,
    COL_FORM_STATUS,
];

pub const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const META_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M %p";

/// CONTROL_ALMACEN 中位于物料代码之后的 A 侧数值列
const TRAILING_NUMERIC_ATTRIBUTES: [&str; 2] = ["vlr_cliente", "valor_costo"];

// ==========================================
// AnsMeta - META_INFO 内容
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsMeta {
    pub source_name: String,         // 数据来源（A 侧名称）
    pub processed_at: NaiveDateTime, // 处理时间
    pub origin_file: String,         // 源文件名
}

fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format(ISO_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn summary_sheet(headers: [&str; 2], summary: &[SummaryLine]) -> SheetData {
    let mut sheet = SheetData::new(SHEET_SUMMARY, headers);
    for line in summary {
        sheet.push_row(vec![line.label.clone().into(), line.total.into()]);
    }
    sheet
}

// ==========================================
// ANS 工作簿
// ==========================================

/// 构建 ANS 工作簿全部工作表
pub fn ans_sheets(
    evaluated: &[EvaluatedWorkOrder],
    summary: &[SummaryLine],
    rules: &[AgreedDaysRule],
    meta: &AnsMeta,
) -> Vec<SheetData> {
    vec![
        ans_detail_sheet(evaluated),
        summary_sheet(["ESTADO", "CANTIDAD"], summary),
        agreed_days_sheet(rules),
        meta_sheet(meta),
    ]
}

/// FENIX_ANS: 透传列 + 派生列
///
/// 透传列取首条记录的列顺序；FECHA_INICIO_ANS 以解析后的 ISO 文本输出。
/// 任一工单带表单状态时追加 FORMULARIO_FENIX 列。
pub fn ans_detail_sheet(evaluated: &[EvaluatedWorkOrder]) -> SheetData {
    let passthrough: Vec<String> = evaluated
        .first()
        .map(|e| {
            e.record
                .fields
                .iter()
                .map(|(name, _)| name.clone())
                .filter(|name| !DERIVED_COLUMNS.contains(&name.as_str()))
                .collect()
        })
        .unwrap_or_default();
    let with_form = evaluated.iter().any(|e| e.record.form_status.is_some());

    let mut headers = passthrough.clone();
    headers.extend(
        [COL_AGREED_DAYS, COL_DEADLINE, COL_ELAPSED, COL_REMAINING, COL_STATUS]
            .iter()
            .map(|c| c.to_string()),
    );
    if with_form {
        headers.push(COL_FORM_STATUS.to_string());
    }

    let mut sheet = SheetData::new(SHEET_ANS, headers);
    for item in evaluated {
        let record = &item.record;
        let outcome = &item.outcome;

        let mut row: Vec<CellValue> = passthrough
            .iter()
            .map(|column| {
                if column == COL_START {
                    CellValue::from(format_timestamp(record.start))
                } else {
                    CellValue::from(record.field(column).unwrap_or_default())
                }
            })
            .collect();

        row.push(outcome.agreed_days.into());
        row.push(format_timestamp(outcome.deadline).into());
        row.push(outcome.elapsed.clone().into());
        row.push(outcome.remaining.clone().into());
        row.push(outcome.status.label().into());
        if with_form {
            row.push(record.form_status.clone().unwrap_or_default().into());
        }
        sheet.push_row(row);
    }
    sheet
}

/// CONFIG_DIAS_PACTADOS: 约定天数表
pub fn agreed_days_sheet(rules: &[AgreedDaysRule]) -> SheetData {
    let mut sheet = SheetData::new(
        SHEET_AGREED_DAYS,
        [
            "Actividad",
            "Descripción",
            "Días pactados Urbanos",
            "Días pactados Rurales",
        ],
    );
    for rule in rules {
        let days = |zone: &str| -> CellValue {
            rule.days
                .get(zone)
                .map(|d| CellValue::from(*d))
                .unwrap_or(CellValue::Empty)
        };
        sheet.push_row(vec![
            rule.activity.clone().into(),
            rule.description.clone().into(),
            days(ZONE_URBAN),
            days(ZONE_RURAL),
        ]);
    }
    sheet
}

/// META_INFO: 两列键值（首行即 "Fuente de datos"）
pub fn meta_sheet(meta: &AnsMeta) -> SheetData {
    let mut sheet = SheetData::new(
        SHEET_META,
        ["Fuente de datos".to_string(), meta.source_name.clone()],
    );
    sheet.push_row(vec![
        "Fecha procesamiento".into(),
        meta.processed_at
            .format(META_TIMESTAMP_FORMAT)
            .to_string()
            .into(),
    ]);
    sheet.push_row(vec!["Archivo origen".into(), meta.origin_file.clone().into()]);
    sheet
}

// ==========================================
// 对账工作簿
// ==========================================

/// 构建对账工作簿全部工作表
pub fn reconciliation_sheets(report: &ReconciliationReport, names: &SourceNames) -> Vec<SheetData> {
    vec![
        control_sheet(report, names),
        summary_sheet(["estado_final", "total"], &report.summary),
        unmatched_sheet(report, names),
    ]
}

/// CONTROL_ALMACEN: pedido + A 侧描述列 + codigo + cantidad + 数值列 + B 侧数量 + 差值 + 状态
pub fn control_sheet(report: &ReconciliationReport, names: &SourceNames) -> SheetData {
    let cleaner = DataCleaner;
    let leading: Vec<String> = report
        .matched
        .iter()
        .find(|row| !row.attributes.is_empty())
        .map(|row| {
            row.attributes
                .iter()
                .map(|(name, _)| name.clone())
                .filter(|name| !TRAILING_NUMERIC_ATTRIBUTES.contains(&name.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let mut headers = vec!["pedido".to_string()];
    headers.extend(leading.iter().cloned());
    headers.push("codigo".to_string());
    headers.push("cantidad".to_string());
    headers.extend(TRAILING_NUMERIC_ATTRIBUTES.iter().map(|c| c.to_string()));
    headers.push(format!("cantidad_{}", names.source_b.to_lowercase()));
    headers.push("diferencia".to_string());
    headers.push("status".to_string());

    let mut sheet = SheetData::new(SHEET_CONTROL, headers);
    for row in &report.matched {
        let mut cells: Vec<CellValue> = vec![row.order_id.clone().into()];
        cells.extend(
            leading
                .iter()
                .map(|column| CellValue::from(attribute(row, column).unwrap_or_default())),
        );
        cells.push(row.item_code.clone().into());
        cells.push(row.qty_a.into());
        cells.extend(TRAILING_NUMERIC_ATTRIBUTES.iter().map(|column| {
            CellValue::from(cleaner.parse_quantity(attribute(row, column).unwrap_or_default()))
        }));
        cells.push(row.qty_b.into());
        cells.push(row.difference.into());
        cells.push(row.status.label(names).into());
        sheet.push_row(cells);
    }
    sheet
}

fn attribute<'a>(row: &'a ReconciliationRow, name: &str) -> Option<&'a str> {
    row.attributes
        .iter()
        .find(|(column, _)| column == name)
        .map(|(_, value)| value.as_str())
}

/// NO_COINCIDEN: pedido / codigo / cantidad / cantidad_<B> / origen
pub fn unmatched_sheet(report: &ReconciliationReport, names: &SourceNames) -> SheetData {
    let mut sheet = SheetData::new(
        SHEET_UNMATCHED,
        [
            "pedido".to_string(),
            "codigo".to_string(),
            "cantidad".to_string(),
            format!("cantidad_{}", names.source_b.to_lowercase()),
            "origen".to_string(),
        ],
    );
    for row in &report.unmatched {
        sheet.push_row(vec![
            row.order_id.clone().into(),
            row.item_code.clone().into(),
            row.qty_a.into(),
            row.qty_b.into(),
            row.status.label(names).into(),
        ]);
    }
    sheet
}

// ==========================================
// 清洗工作簿
// ==========================================

/// 构建清洗工作簿（FENIX_CLEAN + RESUMEN）
pub fn cleaning_sheets(table: &RawTable, report: &CleaningReport) -> Vec<SheetData> {
    let mut clean = SheetData::new(SHEET_CLEAN, table.headers.iter().cloned());
    for row in &table.rows {
        clean.push_row(row.cells.iter().map(|c| CellValue::from(c.as_str())).collect());
    }

    let mut summary = SheetData::new(SHEET_SUMMARY, ["MÉTRICA", "VALOR"]);
    for (label, value) in [
        ("Total registros", report.kept_rows),
        ("Filas completamente vacías", report.empty_rows),
        ("Duplicados por PEDIDO", report.duplicate_orders),
        ("Registros descartados por ACTIVIDAD", report.discarded_activity),
        ("FECHA_INICIO_ANS no interpretable", report.unparsed_start),
    ] {
        summary.push_row(vec![label.into(), value.into()]);
    }

    vec![clean, summary]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::UnmatchedRow;
    use crate::domain::types::{ReconStatus, SlaStatus};
    use crate::domain::work_order::{SlaOutcome, WorkOrderRecord};
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn evaluated(form_status: Option<&str>) -> EvaluatedWorkOrder {
        EvaluatedWorkOrder {
            record: WorkOrderRecord {
                row_number: 2,
                order_id: "22000001".to_string(),
                activity: "ACREV".to_string(),
                zone: "URBANO".to_string(),
                start: Some(ts(2025, 3, 21, 10, 0)),
                form_status: form_status.map(String::from),
                fields: vec![
                    ("PEDIDO".to_string(), "22000001".to_string()),
                    ("FECHA_INICIO_ANS".to_string(), "21/03/2025 10:00".to_string()),
                    ("ESTADO".to_string(), "viejo".to_string()),
                ],
            },
            outcome: SlaOutcome {
                agreed_days: 4,
                deadline: Some(ts(2025, 3, 28, 10, 0)),
                elapsed: "2 días 10:00".to_string(),
                remaining: "1 días 10:00".to_string(),
                status: SlaStatus::Alerta,
            },
        }
    }

    #[test]
    fn test_ans_detail_sheet_layout() {
        let sheet = ans_detail_sheet(&[evaluated(None)]);
        assert_eq!(
            sheet.headers,
            vec![
                "PEDIDO",
                "FECHA_INICIO_ANS",
                "DIAS_PACTADOS",
                "FECHA_LIMITE_ANS",
                "DIAS_TRANSCURRIDOS",
                "DIAS_RESTANTES",
                "ESTADO"
            ]
        );
        assert_eq!(
            sheet.cell(0, "FECHA_INICIO_ANS"),
            Some(&CellValue::text("2025-03-21 10:00:00"))
        );
        assert_eq!(
            sheet.cell(0, "FECHA_LIMITE_ANS"),
            Some(&CellValue::text("2025-03-28 10:00:00"))
        );
        assert_eq!(sheet.cell(0, "DIAS_PACTADOS"), Some(&CellValue::Number(4.0)));
        assert_eq!(sheet.cell(0, "ESTADO"), Some(&CellValue::text("ALERTA")));
    }

    #[test]
    fn test_ans_detail_sheet_with_form_column() {
        let sheet = ans_detail_sheet(&[evaluated(Some("SIN DATO"))]);
        assert_eq!(sheet.headers.last().map(String::as_str), Some(COL_FORM_STATUS));
        assert_eq!(sheet.cell(0, COL_FORM_STATUS), Some(&CellValue::text("SIN DATO")));
    }

    #[test]
    fn test_meta_sheet() {
        let sheet = meta_sheet(&AnsMeta {
            source_name: "FENIX".to_string(),
            processed_at: ts(2025, 3, 26, 15, 5),
            origin_file: "pendientes_FENIX.csv".to_string(),
        });
        assert_eq!(sheet.headers, vec!["Fuente de datos", "FENIX"]);
        assert_eq!(sheet.rows[0][1], CellValue::text("26/03/2025 03:05 PM"));
        assert_eq!(sheet.rows[1][1], CellValue::text("pendientes_FENIX.csv"));
    }

    #[test]
    fn test_agreed_days_sheet() {
        let rules = crate::config::AnsConfig::default().agreed_days;
        let sheet = agreed_days_sheet(&rules);
        assert_eq!(sheet.len(), 10);
        assert_eq!(sheet.rows[1][0], CellValue::text("ALEGN"));
        assert_eq!(sheet.rows[1][2], CellValue::Number(7.0));
        assert_eq!(sheet.rows[1][3], CellValue::Number(10.0));
    }

    #[test]
    fn test_reconciliation_sheets() {
        let names = SourceNames::default();
        let report = ReconciliationReport {
            matched: vec![ReconciliationRow {
                order_id: "12345678".to_string(),
                item_code: "200492".to_string(),
                code_equiv: "200492".to_string(),
                attributes: vec![
                    ("municipio".to_string(), "BELLO".to_string()),
                    ("vlr_cliente".to_string(), "1500".to_string()),
                ],
                qty_a: 3.0,
                qty_b: 1.0,
                difference: 2.0,
                status: ReconStatus::ShortfallInB,
            }],
            unmatched: vec![UnmatchedRow {
                order_id: "12345679".to_string(),
                item_code: "100001".to_string(),
                qty_a: None,
                qty_b: Some(2.0),
                status: ReconStatus::OnlyInB,
            }],
            summary: vec![
                SummaryLine {
                    label: "FALTANTE EN ELITE".to_string(),
                    total: 1,
                },
                SummaryLine {
                    label: "TOTAL GENERAL".to_string(),
                    total: 1,
                },
            ],
            discarded_source_b: 0,
            exempt_kept: 0,
            pair_adjustments: 0,
            unmatched_removed: 0,
        };

        let sheets = reconciliation_sheets(&report, &names);
        let control = &sheets[0];
        assert_eq!(
            control.headers,
            vec![
                "pedido",
                "municipio",
                "codigo",
                "cantidad",
                "vlr_cliente",
                "valor_costo",
                "cantidad_elite",
                "diferencia",
                "status"
            ]
        );
        assert_eq!(control.cell(0, "vlr_cliente"), Some(&CellValue::Number(1500.0)));
        assert_eq!(control.cell(0, "valor_costo"), Some(&CellValue::Number(0.0)));
        assert_eq!(control.cell(0, "status"), Some(&CellValue::text("FALTANTE EN ELITE")));

        assert_eq!(sheets[1].name, SHEET_SUMMARY);
        assert_eq!(sheets[1].len(), 2);

        let unmatched = &sheets[2];
        assert_eq!(unmatched.rows[0][2], CellValue::Empty);
        assert_eq!(unmatched.rows[0][4], CellValue::text("Solo en ELITE"));
    }
}
