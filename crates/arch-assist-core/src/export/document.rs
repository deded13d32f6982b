//! CSV document building and the file sink

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::{Error, Result};
use crate::form::QuantityRow;

/// File name used for every export
pub const EXPORT_FILE_NAME: &str = "archaeology-materials.csv";

/// Media type of the exported document
pub const EXPORT_MIME: &str = "text/csv;charset=utf-8";

const HEADER: [&str; 3] = ["Category", "Material", "Quantity"];

/// Serialize rows as CSV text.
///
/// Fields are quoted only when they contain a comma, a double quote or a line
/// break. Lines are separated by `\n` with no trailing newline.
pub fn build_csv(rows: &[QuantityRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.entry.category.as_str(),
            row.entry.name.as_str(),
            row.quantity.to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("CSV flush error: {}", e.error())))?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV encoding error: {}", e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// A built CSV export ready to hand to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub text: String,
    pub built_at: DateTime<Local>,
}

impl CsvDocument {
    /// Build the document from the current rows
    pub fn from_rows(rows: &[QuantityRow]) -> Result<Self> {
        Ok(Self::new(build_csv(rows)?))
    }

    fn new(text: String) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            text,
            built_at: Local::now(),
        }
    }

    /// Number of data lines (excluding the header)
    pub fn row_count(&self) -> usize {
        self.text.lines().count().saturating_sub(1)
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        save_csv(&self.text, dir)
    }
}

/// Write already-built CSV text to `dir/archaeology-materials.csv`
pub fn save_csv(text: &str, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, text)?;

    info!(path = %path.display(), bytes = text.len(), "Saved CSV export");
    Ok(path)
}
