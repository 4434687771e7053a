// ==========================================
// 控制 ANS - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 列名标准化 / 时间与数量解析
// 红线: 解析失败不报错,统一降级为 None / 0
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};

/// 视为空值的标记（比较时忽略大小写）
const NULL_MARKERS: [&str; 3] = ["NAN", "NONE", "NULL"];

/// 日/月/年优先的时间格式
const DAY_FIRST_DATETIME_FORMATS: [&str; 8] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%m-%Y %I:%M:%S %p",
    "%d-%m-%Y %I:%M %p",
];

const ISO_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

pub struct DataCleaner;

impl DataCleaner {
    /// 文本清洗（TRIM,可选 UPPER）
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 是否为空值（空串 / NAN / NONE / NULL）
    pub fn is_null(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || NULL_MARKERS
                .iter()
                .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    }

    /// NULL 标准化
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            if self.is_null(&v) {
                None
            } else {
                Some(v.trim().to_string())
            }
        })
    }

    /// 列名标准化: TRIM → UPPER → 空格转下划线 → 去重音
    ///
    /// 例: " Tipo Dirección " → "TIPO_DIRECCION"
    pub fn normalize_column_name(&self, name: &str) -> String {
        fold_accents(&name.trim().to_uppercase().replace(' ', "_"))
    }

    /// 去除单引号（地址等字段的 Excel 文本前缀）
    pub fn strip_quotes(&self, value: &str) -> String {
        value.replace('\'', "").trim().to_string()
    }

    /// 解析时间戳（日优先）
    ///
    /// 支持:
    /// - dd/mm/yyyy[ HH:MM[:SS]]、dd-mm-yyyy ...、12 小时制 AM/PM
    /// - yyyy-mm-dd[ HH:MM:SS]（含 T 分隔）
    /// - 仅日期时时间为 00:00:00
    ///
    /// 空值或无法解析 → None
    pub fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        if self.is_null(value) {
            return None;
        }
        let normalized = normalize_meridiem(value.trim());
        let text = normalized.as_str();

        let iso_first = text.chars().take(4).filter(|c| c.is_ascii_digit()).count() == 4;
        let datetime_formats: Vec<&str> = if iso_first {
            ISO_DATETIME_FORMATS
                .iter()
                .chain(DAY_FIRST_DATETIME_FORMATS.iter())
                .copied()
                .collect()
        } else {
            DAY_FIRST_DATETIME_FORMATS
                .iter()
                .chain(ISO_DATETIME_FORMATS.iter())
                .copied()
                .collect()
        };

        for format in datetime_formats {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
                return Some(parsed);
            }
        }

        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// 解析数量（宽松）
    ///
    /// "2,5" → 2.5；空值或非数值 → 0
    pub fn parse_quantity(&self, value: &str) -> f64 {
        if self.is_null(value) {
            return 0.0;
        }
        let text = value.trim();
        let normalized = if text.contains(',') && !text.contains('.') {
            text.replace(',', ".")
        } else {
            text.replace(',', "")
        };
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// 去重音（含 Ñ → N）
fn fold_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            'Ç' => 'C',
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// 西语上下午标记 "a. m." / "p. m." → AM / PM
fn normalize_meridiem(value: &str) -> String {
    let lower = value.to_lowercase();
    let replaced = lower
        .replace("a. m.", "AM")
        .replace("p. m.", "PM")
        .replace("a.m.", "AM")
        .replace("p.m.", "PM");
    if replaced == lower {
        value.to_string()
    } else {
        replaced
    }
}
