// ==========================================
// 控制 ANS - ANS 期限计算引擎
// ==========================================
// 依据: ANS 计算规则 - 期限规则 / 已用工作日 / 剩余状态机
// 红线: 期限保留开始时间的时分秒
// 红线: 当前时间由调用方注入,引擎不读取系统时钟
// ==========================================
// 职责: 约定天数查询 + 期限计算 + 已用/剩余标签 + 状态判定
// 输入: WorkOrderRecord + now
// 输出: SlaOutcome
// ==========================================

use crate::config::{AgreedDaysTable, AnsSettings};
use crate::domain::types::{SlaStatus, SummaryLine};
use crate::domain::work_order::{EvaluatedWorkOrder, SlaOutcome, WorkOrderRecord};
use crate::engine::calendar::BusinessCalendar;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;
use tracing::instrument;


/// 剩余标签: 已逾期
pub const OVERDUE_LABEL: &str = "VENCIDO";

/// 天数标签中的单位
const DAYS_UNIT: &str = "días";

// ==========================================
// SlaEngine - ANS 期限计算引擎
// ==========================================
pub struct SlaEngine {
    calendar: BusinessCalendar,
    agreed_days: AgreedDaysTable,
}

impl SlaEngine {
    /// 创建新的 ANS 引擎
    pub fn new(calendar: BusinessCalendar, agreed_days: AgreedDaysTable) -> Self {
        Self {
            calendar,
            agreed_days,
        }
    }

    /// 从运行期配置创建
    pub fn from_settings(settings: &AnsSettings) -> Self {
        Self::new(settings.calendar.clone(), settings.agreed_days.clone())
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    // ==========================================
    // 批量计算
    // ==========================================

    /// 批量计算 ANS 结果
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn evaluate_batch(
        &self,
        records: Vec<WorkOrderRecord>,
        now: NaiveDateTime,
    ) -> Vec<EvaluatedWorkOrder> {
        let evaluated: Vec<EvaluatedWorkOrder> = records
            .into_iter()
            .map(|record| {
                let outcome = self.evaluate(&record, now);
                EvaluatedWorkOrder { record, outcome }
            })
            .collect();

        let overdue = evaluated
            .iter()
            .filter(|e| e.outcome.status == SlaStatus::Vencido)
            .count();
        tracing::info!(total = evaluated.len(), overdue, "ANS 计算完成");

        evaluated
    }

    /// 单条工单计算
    pub fn evaluate(&self, record: &WorkOrderRecord, now: NaiveDateTime) -> SlaOutcome {
        let agreed_days = self.agreed_days.lookup(&record.activity, &record.zone);
        let deadline = self.deadline(record.start, i64::from(agreed_days));
        let elapsed = self.elapsed_label(record.start, now);
        let remaining = self.remaining_label(record.start, deadline, now);
        let status = status_from_remaining(&remaining);

        SlaOutcome {
            agreed_days,
            deadline,
            elapsed,
            remaining,
            status,
        }
    }

    // ==========================================
    // 期限规则
    // ==========================================

    /// 计算 ANS 期限（加 N 个工作日,保留时分秒）
    ///
    /// 规则:
    /// 1) start 为空 或 N <= 0 → None
    /// 2) 开始日为非工作日 → 基准日 = 当天之后（含当天）第一个工作日
    /// 3) 开始日为工作日 → 基准日 = 严格晚于当天的第一个工作日
    /// 4) 从基准日再前进 N-1 个工作日
    pub fn deadline(&self, start: Option<NaiveDateTime>, days: i64) -> Option<NaiveDateTime> {
        let start = start?;
        if days <= 0 {
            return None;
        }

        let start_date = start.date();
        let base_day = if self.calendar.is_working_day(start_date) {
            self.calendar.next_working_day_after(start_date)?
        } else {
            self.calendar.roll_forward(start_date)?
        };

        // 超出日期范围 → 无期限
        let remaining_steps = u32::try_from(days - 1).ok()?;
        let last_day = self.calendar.offset(base_day, remaining_steps)?;
        Some(last_day.and_time(start.time()))
    }

    // ==========================================
    // 已用工作日
    // ==========================================

    /// 已用工作日数
    ///
    /// 计数区间 [开始日+1, now 日期)，若 now 日期为工作日且晚于开始日+1 则再加 1。
    pub fn elapsed_days(&self, start: NaiveDateTime, now: NaiveDateTime) -> i64 {
        let begin = start.date() + Duration::days(1);
        let end = now.date();

        let mut days = self.calendar.busday_count(begin, end);
        if self.calendar.is_working_day(end) && end > begin {
            days += 1;
        }
        days
    }

    /// 已用工作日标签 "<N> días HH:MM"（start 为空时为空串）
    pub fn elapsed_label(&self, start: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
        match start {
            Some(start) => days_label(self.elapsed_days(start, now), start),
            None => String::new(),
        }
    }

    // ==========================================
    // 剩余状态机
    // ==========================================

    /// 剩余标签
    ///
    /// - start/deadline 为空 → ""
    /// - now > deadline → "VENCIDO"
    /// - 同一天: now 时刻早于期限时刻 → "0 días HH:MM"，否则 "VENCIDO"
    /// - 其他: 严格介于两日期之间的工作日数；为 0 则记 1；
    ///   now 之后第一个工作日即期限日时也记 1
    pub fn remaining_label(
        &self,
        start: Option<NaiveDateTime>,
        deadline: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> String {
        let (start, deadline) = match (start, deadline) {
            (Some(start), Some(deadline)) => (start, deadline),
            _ => return String::new(),
        };

        if now > deadline {
            return OVERDUE_LABEL.to_string();
        }

        let today = now.date();
        let deadline_day = deadline.date();

        if today == deadline_day {
            return if now.time() < deadline.time() {
                days_label(0, start)
            } else {
                OVERDUE_LABEL.to_string()
            };
        }

        let mut days = self.calendar.count_strictly_between(today, deadline_day);
        if days == 0 {
            days = 1;
        }
        if self.calendar.next_working_day_after(today) == Some(deadline_day) {
            days = 1;
        }

        days_label(days, start)
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 按状态汇总（数量降序,同数量按标签升序）
    pub fn summarize(evaluated: &[EvaluatedWorkOrder]) -> Vec<SummaryLine> {
        let mut counts: HashMap<SlaStatus, usize> = HashMap::new();
        for item in evaluated {
            *counts.entry(item.outcome.status).or_insert(0) += 1;
        }

        let mut lines: Vec<SummaryLine> = counts
            .into_iter()
            .map(|(status, total)| SummaryLine {
                label: status.label().to_string(),
                total,
            })
            .collect();
        lines.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
        lines
    }
}

/// 由剩余标签判定状态
///
/// - "VENCIDO" → VENCIDO
/// - "<n> días ..." : n = 0 → ALERTA_0；n <= 2 → ALERTA；否则 A_TIEMPO
/// - 空串或无法解析 → SIN_FECHA
pub fn status_from_remaining(remaining: &str) -> SlaStatus {
    let value = remaining.trim();
    if value == OVERDUE_LABEL {
        return SlaStatus::Vencido;
    }
    if !value.contains(DAYS_UNIT) {
        return SlaStatus::SinFecha;
    }

    match value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
    {
        Some(0) => SlaStatus::Alerta0,
        Some(n) if n <= 2 => SlaStatus::Alerta,
        Some(_) => SlaStatus::ATiempo,
        None => SlaStatus::SinFecha,
    }
}

fn days_label(days: i64, start: NaiveDateTime) -> String {
    format!("{} {} {}", days, DAYS_UNIT, start.format("%H:%M"))
}
