mod local_sheet;
mod memory_sheet;

pub use local_sheet::LocalSheet;
pub use memory_sheet::MemorySheet;

use crate::prelude::*;
use crate::record::SheetRow;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const HEADER_LABELS: [&str; 3] = ["Timestamp", "Status", "Formatted Time"];

/// Row 0 of a sheet. Labels plus the optional display layout applied by
/// initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetHeader {
    pub labels: Vec<String>,
    pub style: Option<HeaderStyle>,
    pub column_widths: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderStyle {
    pub bold: bool,
    pub background: String,
    pub font_color: String,
}

impl SheetHeader {
    /// Labels only, as written when a sheet file is first created.
    pub fn plain() -> Self {
        Self {
            labels: HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
            style: None,
            column_widths: Vec::new(),
        }
    }

    /// The header written by initialization.
    pub fn styled() -> Self {
        Self {
            labels: HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
            style: Some(HeaderStyle {
                bold: true,
                background: "#4285f4".into(),
                font_color: "white".into(),
            }),
            column_widths: vec![180, 80, 150],
        }
    }
}

/// Append-only tabular store. Data rows are addressed from 0, the header is
/// kept apart and never counted as data.
pub trait Sheet: Send + Sync {
    fn write_header(&self, header: &SheetHeader) -> impl Future<Output = Result<()>> + Send;
    fn header(&self) -> impl Future<Output = Result<Option<SheetHeader>>> + Send;
    fn append_row(&self, row: SheetRow) -> impl Future<Output = Result<()>> + Send;
    fn row_count(&self) -> impl Future<Output = Result<usize>> + Send;
    /// Rows `start..start + count`, clamped to the rows that exist.
    fn read_rows(
        &self,
        start: usize,
        count: usize,
    ) -> impl Future<Output = Result<Vec<SheetRow>>> + Send;
    /// Removes rows `start..start + count`, clamped to the rows that exist.
    fn delete_rows(&self, start: usize, count: usize) -> impl Future<Output = Result<()>> + Send;
}
