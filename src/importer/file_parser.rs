// ==========================================
// 控制 ANS - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls) / CSV (.csv)
// 红线: 单元格统一转为文本,类型转换在清洗阶段完成
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::raw_table::{RawTable, SheetGrid};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 读取全部工作表为单元格网格（不识别表头）
    fn read_grids(&self, file_path: &Path) -> ImportResult<Vec<SheetGrid>>;

    /// 解析首个工作表（首行为表头）
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let grid = self
            .read_grids(file_path)?
            .into_iter()
            .next()
            .ok_or_else(|| ImportError::EmptyFile(file_path.display().to_string()))?;
        Ok(RawTable::from_grid(grid, 0))
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn read_grids(&self, file_path: &Path) -> ImportResult<Vec<SheetGrid>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut cells = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(decode_field).collect();
            cells.push(row);
        }

        // 去除 UTF-8 BOM
        if let Some(first) = cells.first_mut().and_then(|row| row.first_mut()) {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }

        let name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(vec![SheetGrid {
            name,
            first_row: 0,
            cells,
        }])
    }
}

/// 字段解码: UTF-8 优先,否则按 Latin-1 逐字节解码
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(_) => bytes
            .iter()
            .map(|&b| b as char)
            .collect::<String>()
            .trim()
            .to_string(),
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Default)]
pub struct ExcelParser {
    sheet: Option<String>, // 指定工作表（None = 首个工作表）
}

impl ExcelParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定 parse_table 读取的工作表
    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    /// 工作表名称列表
    pub fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names().to_vec())
    }

    fn read_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<SheetGrid> {
        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        let name = match sheet {
            Some(name) => sheet_names
                .iter()
                .find(|s| s.as_str() == name)
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound(name.to_string()))?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&name)?;
        Ok(grid_from_range(name, &range))
    }

    fn check_extension(file_path: &Path) -> ImportResult<()> {
        let ext = extension_of(file_path);
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" => Ok(()),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl FileParser for ExcelParser {
    fn read_grids(&self, file_path: &Path) -> ImportResult<Vec<SheetGrid>> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut grids = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            grids.push(grid_from_range(name, &range));
        }
        Ok(grids)
    }

    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;

        let grid = self.read_sheet(file_path, self.sheet.as_deref())?;
        if grid.cells.is_empty() {
            return Err(ImportError::EmptyFile(file_path.display().to_string()));
        }
        Ok(RawTable::from_grid(grid, 0))
    }
}

fn grid_from_range(name: String, range: &calamine::Range<Data>) -> SheetGrid {
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let cells = range
        .rows()
        .map(|row| {
            // 区域不从 A 列开始时补齐前导空列,保持列位置
            let mut values = vec![String::new(); first_col];
            values.extend(row.iter().map(cell_to_string));
            values
        })
        .collect();

    SheetGrid {
        name,
        first_row,
        cells,
    }
}

/// 单元格 → 文本
///
/// - 整数值浮点数去掉小数部分（工单号/代码常以数值存储）
/// - 日期单元格输出 `%Y-%m-%d %H:%M:%S`
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn parser_for(path: &Path) -> ImportResult<Box<dyn FileParser>> {
        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xlsm" | "xls" => Ok(Box::new(ExcelParser::new())),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        Self::parser_for(path)?.parse_table(path)
    }

    pub fn read_grids<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<SheetGrid>> {
        let path = file_path.as_ref();
        Self::parser_for(path)?.read_grids(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv() -> tempfile::NamedTempFile {
        Builder::new().suffix(".csv").tempfile().unwrap()
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = temp_csv();
        writeln!(temp_file, "PEDIDO,ACTIVIDAD,TIPO_DIRECCION").unwrap();
        writeln!(temp_file, "22000001,ACREV,URBANO").unwrap();
        writeln!(temp_file, "22000002, ALEGN ,RURAL").unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers, vec!["PEDIDO", "ACTIVIDAD", "TIPO_DIRECCION"]);
        assert_eq!(table.value(&table.rows[0], "PEDIDO"), "22000001");
        assert_eq!(table.value(&table.rows[1], "ACTIVIDAD"), "ALEGN");
        assert_eq!(table.rows[1].row_number, 3);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let mut temp_file = temp_csv();
        writeln!(temp_file, "PEDIDO,CANTIDAD").unwrap();
        writeln!(temp_file, "22000001,2.5").unwrap();
        writeln!(temp_file, ",").unwrap(); // 空行
        writeln!(temp_file, "22000002,3").unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_csv_parser_latin1_fallback() {
        let mut temp_file = temp_csv();
        temp_file.write_all(b"PEDIDO,DIRECCI\xd3N\n").unwrap();
        temp_file.write_all(b"22000001,CALLE 10\n").unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();
        assert_eq!(table.headers[1], "DIRECCIÓN");
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let mut temp_file = temp_csv();
        temp_file.write_all("\u{feff}PEDIDO\n22000001\n".as_bytes()).unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();
        assert_eq!(table.headers[0], "PEDIDO");
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(12345678.0)), "12345678");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(200492)), "200492");
        assert_eq!(cell_to_string(&Data::String(" ACREV ".to_string())), "ACREV");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
