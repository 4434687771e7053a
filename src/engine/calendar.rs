// ==========================================
// 控制 ANS - 工作日日历
// ==========================================
// 依据: ANS 计算规则 - Calendar
// 红线: 工作日 = 周一至周五 且 不在节假日集合内
// 红线: 节假日为纯日期（无时间部分），对所有日期生效
// ==========================================
// 职责: 工作日判定 + 工作日偏移 + 工作日计数
// 注: 所有工作日算术只在此处实现
// ==========================================

use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

// ==========================================
// BusinessCalendar - 工作日日历
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// 创建日历
    ///
    /// # 参数
    /// - holidays: 节假日列表（重复日期自动去重）
    pub fn new<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// 仅排除周末的日历（无节假日）
    pub fn weekdays_only() -> Self {
        Self::default()
    }

    /// 节假日（升序）
    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// 是否为工作日
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// 向后滚动到第一个工作日（含当天）
    ///
    /// 超出可表示日期范围时返回 None。
    pub fn roll_forward(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        while !self.is_working_day(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// 严格晚于 date 的第一个工作日
    pub fn next_working_day_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.roll_forward(date.succ_opt()?)
    }

    /// 工作日偏移
    ///
    /// 先向后滚动到工作日（含当天），再前进 n 个工作日。
    ///
    /// # 示例
    /// - 周六 + 0 → 下周一
    /// - 周五 + 1 → 下周一
    pub fn offset(&self, date: NaiveDate, n: u32) -> Option<NaiveDate> {
        // n 个工作日至少跨越 n 个自然日
        date.checked_add_days(Days::new(u64::from(n)))?;

        let mut current = self.roll_forward(date)?;
        for _ in 0..n {
            current = self.next_working_day_after(current)?;
        }
        Some(current)
    }

    /// 工作日计数 [begin, end)
    ///
    /// begin > end 时返回 [end, begin) 计数的相反数。
    pub fn busday_count(&self, begin: NaiveDate, end: NaiveDate) -> i64 {
        if begin > end {
            return -self.busday_count(end, begin);
        }

        let mut count = 0;
        let mut current = begin;
        while current < end {
            if self.is_working_day(current) {
                count += 1;
            }
            current += Duration::days(1);
        }
        count
    }

    /// 严格位于两个日期之间的工作日数 (from, to)
    ///
    /// to <= from 时为 0。
    pub fn count_strictly_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        if to <= from {
            return 0;
        }
        self.busday_count(from + Duration::days(1), to)
    }
}
