// ==========================================
// 控制 ANS - 原始表结构
// ==========================================
// 职责: 解析器产出的中间结构（表头 + 文本单元格）
// 红线: 列顺序保持源文件顺序（透传列按此输出）
// ==========================================

use std::collections::HashMap;

// ==========================================
// SheetGrid - 工作表单元格网格（无表头语义）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub first_row: usize, // cells[0] 在源文件中的行下标（从 0 开始）
    pub cells: Vec<Vec<String>>,
}

impl SheetGrid {
    /// 查找首个包含关键字的行（整行小写拼接后匹配）
    pub fn find_row_containing(&self, keyword: &str) -> Option<usize> {
        let keyword = keyword.to_lowercase();
        self.cells.iter().position(|row| {
            row.iter()
                .filter(|cell| !cell.is_empty())
                .map(|cell| cell.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ")
                .contains(&keyword)
        })
    }
}

// ==========================================
// RawRow / RawTable
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 源文件行号（从 1 开始）
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 由网格构建表
    ///
    /// # 参数
    /// - header_index: 表头在网格中的下标,其后各行为数据行
    ///
    /// 完全空白的数据行被跳过；短行按表头宽度补空。
    pub fn from_grid(grid: SheetGrid, header_index: usize) -> Self {
        let mut rows_iter = grid.cells.into_iter().enumerate().skip(header_index);

        let headers: Vec<String> = match rows_iter.next() {
            Some((_, header)) => header.into_iter().map(|h| h.trim().to_string()).collect(),
            None => Vec::new(),
        };

        let width = headers.len();
        let rows = rows_iter
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(idx, mut cells)| {
                cells.resize(width, String::new());
                RawRow {
                    row_number: grid.first_row + idx + 1,
                    cells,
                }
            })
            .collect();

        Self {
            sheet: grid.name,
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// 读取单元格（列不存在时为空串）
    pub fn value<'a>(&self, row: &'a RawRow, column: &str) -> &'a str {
        self.column_index(column)
            .and_then(|idx| row.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 行 → HashMap<列名, 值>（重复列名以后出现者为准）
    pub fn to_record(&self, row: &RawRow) -> HashMap<String, String> {
        self.headers
            .iter()
            .cloned()
            .zip(row.cells.iter().cloned())
            .collect()
    }

    /// 行 → 按列顺序的 (列名, 值)
    pub fn to_fields(&self, row: &RawRow) -> Vec<(String, String)> {
        self.headers
            .iter()
            .cloned()
            .zip(row.cells.iter().cloned())
            .collect()
    }

    /// 重命名全部列
    pub fn rename_headers<F>(&mut self, rename: F)
    where
        F: Fn(&str) -> String,
    {
        for header in self.headers.iter_mut() {
            *header = rename(header);
        }
    }

    /// 确保列存在（缺失时追加空列）
    pub fn ensure_column(&mut self, column: &str) {
        if self.column_index(column).is_some() {
            return;
        }
        self.headers.push(column.to_string());
        for row in self.rows.iter_mut() {
            row.cells.push(String::new());
        }
    }

    /// 仅保留并按给定顺序排列列（缺失列补空）
    pub fn select_columns(&mut self, columns: &[&str]) {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        for row in self.rows.iter_mut() {
            row.cells = indices
                .iter()
                .map(|idx| idx.and_then(|i| row.cells.get(i).cloned()).unwrap_or_default())
                .collect();
        }
        self.headers = columns.iter().map(|c| c.to_string()).collect();
    }
}
