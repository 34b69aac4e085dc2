// src/data_loader.rs

use std::fs::File;
use std::path::Path;

use log::debug;

use crate::error::ReportError;

#[derive(Debug)]
pub struct TableData {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>, columns: Vec<Vec<String>>) -> Self {
        TableData { headers, columns }
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

pub trait DataLoader {
    fn load(&self, path: &Path) -> Result<TableData, ReportError>;
}

pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    pub fn comma() -> Self {
        CsvLoader { delimiter: b',' }
    }

    pub fn tab() -> Self {
        CsvLoader { delimiter: b'\t' }
    }
}

impl DataLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<TableData, ReportError> {
        let file = File::open(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(file);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<String>>();

        let mut columns: Vec<Vec<String>> = headers.iter().map(|_| Vec::new()).collect();

        for result in reader.records() {
            let record = result?;
            for (i, field) in record.iter().enumerate() {
                columns[i].push(field.to_string());
            }
        }

        let data = TableData::new(headers, columns);
        debug!(
            "loaded {} rows x {} columns from {}",
            data.row_count(),
            data.headers.len(),
            path.display()
        );
        Ok(data)
    }
}

pub fn get_loader(format: &str) -> Result<Box<dyn DataLoader>, ReportError> {
    match format.to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvLoader::comma())),
        "tsv" => Ok(Box::new(CsvLoader::tab())),
        _ => Err(ReportError::UnsupportedFormat(format.to_string())),
    }
}

/// Picks the loader from `format`, or from the file extension when no format is given.
pub fn loader_for(path: &Path, format: Option<&str>) -> Result<Box<dyn DataLoader>, ReportError> {
    if let Some(format) = format {
        return get_loader(format);
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => get_loader(ext),
        _ => Err(ReportError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}
