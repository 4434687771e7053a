// ==========================================
// 控制 ANS - CSV 写入器
// ==========================================
// 规则: 每个工作表一个文件
// - 输出为目录: <目录>/<工作表>.csv
// - 输出为 .csv 文件: 首个工作表写入该文件,其余写入 <文件名>_<工作表>.csv
// ==========================================

use crate::exporter::error::ExportResult;
use crate::exporter::sheet::SheetData;
use csv::WriterBuilder;
use std::path::{Path, PathBuf};

pub struct CsvWriter;

impl CsvWriter {
    /// 写入全部工作表,返回生成的文件路径
    pub fn write(&self, output: &Path, sheets: &[SheetData]) -> ExportResult<Vec<PathBuf>> {
        let targets = Self::target_paths(output, sheets);
        for (sheet, path) in sheets.iter().zip(targets.iter()) {
            self.write_sheet(path, sheet)?;
        }
        Ok(targets)
    }

    /// 单个工作表 → CSV 文件
    pub fn write_sheet(&self, path: &Path, sheet: &SheetData) -> ExportResult<()> {
        sheet.validate()?;
        let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
        writer.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            writer.write_record(row.iter().map(|cell| cell.to_csv_field()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// 计算各工作表的目标路径
    pub fn target_paths(output: &Path, sheets: &[SheetData]) -> Vec<PathBuf> {
        let is_csv_file = output
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if !is_csv_file {
            return sheets
                .iter()
                .map(|sheet| output.join(format!("{}.csv", sheet.name)))
                .collect();
        }

        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parent = output.parent().unwrap_or_else(|| Path::new(""));

        sheets
            .iter()
            .enumerate()
            .map(|(idx, sheet)| {
                if idx == 0 {
                    output.to_path_buf()
                } else {
                    parent.join(format!("{}_{}.csv", stem, sheet.name))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::sheet::CellValue;
    use tempfile::TempDir;

    fn sheets() -> Vec<SheetData> {
        let mut control = SheetData::new("CONTROL_ALMACEN", ["pedido", "diferencia"]);
        control.push_row(vec!["12345678".into(), 2.0.into()]);
        control.push_row(vec!["12345679".into(), CellValue::Empty]);
        let resumen = SheetData::new("RESUMEN", ["estado_final", "total"]);
        vec![control, resumen]
    }

    #[test]
    fn test_target_paths_for_csv_file() {
        let paths = CsvWriter::target_paths(Path::new("/tmp/salida/control.csv"), &sheets());
        assert_eq!(paths[0], PathBuf::from("/tmp/salida/control.csv"));
        assert_eq!(paths[1], PathBuf::from("/tmp/salida/control_RESUMEN.csv"));
    }

    #[test]
    fn test_target_paths_for_directory() {
        let paths = CsvWriter::target_paths(Path::new("/tmp/salida"), &sheets());
        assert_eq!(paths[0], PathBuf::from("/tmp/salida/CONTROL_ALMACEN.csv"));
        assert_eq!(paths[1], PathBuf::from("/tmp/salida/RESUMEN.csv"));
    }

    #[test]
    fn test_write_directory() {
        let dir = TempDir::new().unwrap();
        let written = CsvWriter.write(dir.path(), &sheets()).unwrap();
        assert_eq!(written.len(), 2);

        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "pedido,diferencia\n12345678,2\n12345679,\n");
        let resumen = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(resumen, "estado_final,total\n");
    }
}
