use super::{Sheet, SheetHeader};
use crate::prelude::*;
use crate::record::SheetRow;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    header: Option<SheetHeader>,
    rows: Vec<SheetRow>,
}

/// In-process sheet. Nothing survives the value being dropped.
#[derive(Debug, Default)]
pub struct MemorySheet {
    inner: Mutex<Inner>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<SheetRow>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                header: Some(SheetHeader::plain()),
                rows,
            }),
        }
    }
}

impl Sheet for MemorySheet {
    async fn write_header(&self, header: &SheetHeader) -> Result<()> {
        self.inner.lock().await.header = Some(header.clone());
        Ok(())
    }

    async fn header(&self) -> Result<Option<SheetHeader>> {
        Ok(self.inner.lock().await.header.clone())
    }

    async fn append_row(&self, row: SheetRow) -> Result<()> {
        self.inner.lock().await.rows.push(row);
        Ok(())
    }

    async fn row_count(&self) -> Result<usize> {
        Ok(self.inner.lock().await.rows.len())
    }

    async fn read_rows(&self, start: usize, count: usize) -> Result<Vec<SheetRow>> {
        let inner = self.inner.lock().await;
        let start = start.min(inner.rows.len());
        let end = start.saturating_add(count).min(inner.rows.len());
        Ok(inner.rows[start..end].to_vec())
    }

    async fn delete_rows(&self, start: usize, count: usize) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let start = start.min(inner.rows.len());
        let end = start.saturating_add(count).min(inner.rows.len());
        inner.rows.drain(start..end);
        Ok(())
    }
}
