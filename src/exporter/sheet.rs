// ==========================================
// 控制 ANS - 导出工作表结构
// ==========================================
// 职责: 写入器无关的表格数据（表头 + 单元格）
// ==========================================

use crate::exporter::error::{ExportError, ExportResult};
use serde::Serialize;

/// Excel 工作表名称长度上限
pub const MAX_SHEET_NAME_LEN: usize = 31;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// CSV 文本表示（整数值不带小数）
    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

// ==========================================
// SheetData - 工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    pub fn new<I, S>(name: &str, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按列名读取单元格
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// 写入前校验: 名称合法、各行宽度不超过表头
    pub fn validate(&self) -> ExportResult<()> {
        let invalid = |message: String| ExportError::InvalidSheet {
            sheet: self.name.clone(),
            message,
        };

        if self.name.trim().is_empty() || self.name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(invalid(format!("名称长度需在 1-{} 之间", MAX_SHEET_NAME_LEN)));
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() > self.headers.len())
        {
            return Err(invalid(format!(
                "第 {} 行有 {} 列,表头只有 {} 列",
                idx + 1,
                row.len(),
                self.headers.len()
            )));
        }
        Ok(())
    }
}
