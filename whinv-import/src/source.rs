//! Tabular data sources
//!
//! Each source yields the whole sheet as rows of cells, addressed from the
//! top-left corner (A1) of the sheet.

use crate::cell::Cell;
use crate::error::ImportError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};

/// Something that can produce a grid of cells
pub trait GridSource {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Read every row
    fn read_grid(&mut self) -> Result<Vec<Vec<Cell>>, ImportError>;
}

/// Excel/ODS workbook, one named sheet
pub struct XlsxSource {
    path: PathBuf,
    sheet: String,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }
}

impl GridSource for XlsxSource {
    fn describe(&self) -> String {
        format!("{} [{}]", self.path.display(), self.sheet)
    }

    fn read_grid(&mut self) -> Result<Vec<Vec<Cell>>, ImportError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| ImportError::Source(format!("{}: {}", self.path.display(), e)))?;

        if !workbook.sheet_names().iter().any(|name| name == &self.sheet) {
            return Err(ImportError::SheetNotFound(self.sheet.clone()));
        }

        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|e| ImportError::Source(format!("{}: {}", self.sheet, e)))?;

        // The used range may not start at A1; pad so indices stay sheet-absolute
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];

        for row in range.rows() {
            let mut cells = vec![Cell::Empty; start_col as usize];
            cells.extend(row.iter().map(cell_from_data));
            grid.push(cells);
        }

        Ok(grid)
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
    }
}

/// Headerless CSV export of the sheet; rows may have different lengths
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GridSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_grid(&mut self) -> Result<Vec<Vec<Cell>>, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ImportError::Source(format!("{}: {}", self.path.display(), e)))?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| ImportError::Source(format!("{}: {}", self.path.display(), e)))?;
            grid.push(record.iter().map(Cell::from).collect());
        }

        Ok(grid)
    }
}

/// Pick a source by file extension (`.csv`, otherwise a workbook)
pub fn open_source(path: &Path, sheet: &str) -> Box<dyn GridSource> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Box::new(CsvSource::new(path))
    } else {
        Box::new(XlsxSource::new(path, sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_source_reads_ragged_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Level,Rack 1,,Rack 2").unwrap();
        writeln!(file, "01,Widget,note").unwrap();
        writeln!(file, "02,,,Gadget,spare").unwrap();

        let grid = CsvSource::new(file.path()).read_grid().unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1].len(), 3);
        assert_eq!(grid[1][1], Cell::Text("Widget".to_string()));
        assert_eq!(grid[2][1], Cell::Empty);
        assert_eq!(grid[2][3], Cell::Text("Gadget".to_string()));
    }

    #[test]
    fn test_missing_csv_is_source_error() {
        let err = CsvSource::new("/nonexistent/aisle.csv").read_grid().unwrap_err();
        assert!(matches!(err, ImportError::Source(_)));
    }

    #[test]
    fn test_missing_workbook_is_source_error() {
        let err = XlsxSource::new("/nonexistent/AISLEMAPPING.xlsx", "AISLE E Parts table")
            .read_grid()
            .unwrap_err();
        assert!(matches!(err, ImportError::Source(_)));
    }

    #[test]
    fn test_open_source_by_extension() {
        let csv = open_source(Path::new("aisle.CSV"), "ignored");
        assert_eq!(csv.describe(), "aisle.CSV");

        let xlsx = open_source(Path::new("AISLEMAPPING.xlsx"), "AISLE E Parts table");
        assert_eq!(xlsx.describe(), "AISLEMAPPING.xlsx [AISLE E Parts table]");
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::String("Widget".to_string())),
            Cell::Text("Widget".to_string())
        );
    }
}
