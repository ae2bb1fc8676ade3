use super::{Sheet, SheetHeader};
use crate::error::StorageError;
use crate::prelude::*;
use crate::record::SheetRow;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Sheet kept in a single file: the header object on the first line, then one
/// JSON array per data row.
pub struct LocalSheet {
    path: PathBuf,
    lock: Mutex<()>,
}

struct Contents {
    header: SheetHeader,
    rows: Vec<String>,
}

impl LocalSheet {
    /// Opens the sheet at `path`, creating it (and its directory) with a plain
    /// header if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileOpen {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let sheet = Self {
            path,
            lock: Mutex::new(()),
        };

        if sheet.needs_header()? {
            sheet.rewrite(&SheetHeader::plain(), &[])?;
            info!("Created sheet at {:?}", sheet.path);
        }

        Ok(sheet)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or empty file has no header line yet.
    fn needs_header(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(source) => Err(StorageError::FileOpen {
                path: self.path.display().to_string(),
                source,
            }
            .into()),
        }
    }

    fn load(&self) -> Result<Contents> {
        let text = fs::read_to_string(&self.path).map_err(StorageError::FileRead)?;
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let header = match lines.next() {
            Some(line) => serde_json::from_str(line).map_err(|e| StorageError::CorruptRow {
                line: 1,
                reason: format!("bad header: {}", e),
            })?,
            None => SheetHeader::plain(),
        };

        Ok(Contents {
            header,
            rows: lines.map(str::to_string).collect(),
        })
    }

    /// Replaces the whole file through a temporary file in the same directory.
    fn rewrite(&self, header: &SheetHeader, rows: &[String]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(StorageError::FileWrite)?;

        writeln!(tmp, "{}", serde_json::to_string(header)?).map_err(StorageError::FileWrite)?;
        for row in rows {
            writeln!(tmp, "{}", row).map_err(StorageError::FileWrite)?;
        }
        tmp.flush().map_err(StorageError::FileWrite)?;

        tmp.persist(&self.path)
            .map_err(|e| StorageError::Persist(e.to_string()))?;
        debug!("Rewrote sheet {:?} with {} rows", self.path, rows.len());
        Ok(())
    }

    fn decode(line: &str, index: usize) -> Result<SheetRow> {
        serde_json::from_str(line).map_err(|e| {
            StorageError::CorruptRow {
                // 1-based file line, header on line 1
                line: index + 2,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Sheet for LocalSheet {
    async fn write_header(&self, header: &SheetHeader) -> Result<()> {
        let _guard = self.lock.lock().await;
        let contents = self.load()?;
        self.rewrite(header, &contents.rows)
    }

    async fn header(&self) -> Result<Option<SheetHeader>> {
        let _guard = self.lock.lock().await;
        Ok(Some(self.load()?.header))
    }

    async fn append_row(&self, row: SheetRow) -> Result<()> {
        let _guard = self.lock.lock().await;
        if self.needs_header()? {
            self.rewrite(&SheetHeader::plain(), &[])?;
        }

        let line = serde_json::to_string(&row)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(StorageError::FileWrite)?;
        writeln!(file, "{}", line).map_err(StorageError::FileWrite)?;
        Ok(())
    }

    async fn row_count(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.rows.len())
    }

    async fn read_rows(&self, start: usize, count: usize) -> Result<Vec<SheetRow>> {
        let _guard = self.lock.lock().await;
        let contents = self.load()?;
        contents
            .rows
            .iter()
            .enumerate()
            .skip(start)
            .take(count)
            .map(|(index, line)| Self::decode(line, index))
            .collect()
    }

    async fn delete_rows(&self, start: usize, count: usize) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut contents = self.load()?;
        let start = start.min(contents.rows.len());
        let end = start.saturating_add(count).min(contents.rows.len());
        if start == end {
            return Ok(());
        }
        contents.rows.drain(start..end);
        self.rewrite(&contents.header, &contents.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(n: u32) -> SheetRow {
        SheetRow(
            format!("2024-01-01T00:00:{:02}.000Z", n),
            if n % 2 == 0 { "ON" } else { "OFF" }.into(),
            format!("2024-01-01 00:00:{:02}", n),
        )
    }

    #[tokio::test]
    async fn open_creates_file_with_plain_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sheet.jsonl");
        let sheet = LocalSheet::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(sheet.header().await.unwrap(), Some(SheetHeader::plain()));
        assert_eq!(sheet.row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rows_survive_reopening() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.jsonl");
        {
            let sheet = LocalSheet::open(&path).unwrap();
            for n in 0..3 {
                sheet.append_row(row(n)).await.unwrap();
            }
        }

        let sheet = LocalSheet::open(&path).unwrap();
        assert_eq!(sheet.row_count().await.unwrap(), 3);
        assert_eq!(sheet.read_rows(0, 3).await.unwrap(), vec![row(0), row(1), row(2)]);
    }

    #[tokio::test]
    async fn header_rewrite_keeps_data_rows() {
        let dir = tempdir().unwrap();
        let sheet = LocalSheet::open(dir.path().join("sheet.jsonl")).unwrap();
        sheet.append_row(row(1)).await.unwrap();

        sheet.write_header(&SheetHeader::styled()).await.unwrap();

        assert_eq!(sheet.header().await.unwrap(), Some(SheetHeader::styled()));
        assert_eq!(sheet.read_rows(0, 10).await.unwrap(), vec![row(1)]);
    }

    #[tokio::test]
    async fn delete_keeps_header_line_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.jsonl");
        let sheet = LocalSheet::open(&path).unwrap();
        sheet.write_header(&SheetHeader::styled()).await.unwrap();
        for n in 0..4 {
            sheet.append_row(row(n)).await.unwrap();
        }

        sheet.delete_rows(0, 2).await.unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let first: SheetHeader = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first, SheetHeader::styled());
        assert_eq!(sheet.read_rows(0, 10).await.unwrap(), vec![row(2), row(3)]);
    }

    #[tokio::test]
    async fn append_after_truncation_restores_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.jsonl");
        let sheet = LocalSheet::open(&path).unwrap();
        sheet.append_row(row(0)).await.unwrap();
        fs::File::create(&path).unwrap();

        sheet.append_row(row(1)).await.unwrap();

        assert_eq!(sheet.header().await.unwrap(), Some(SheetHeader::plain()));
        assert_eq!(sheet.read_rows(0, 10).await.unwrap(), vec![row(1)]);
    }

    #[tokio::test]
    async fn garbage_line_reports_its_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.jsonl");
        let sheet = LocalSheet::open(&path).unwrap();
        sheet.append_row(row(0)).await.unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();

        let err = sheet.read_rows(0, 10).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::CorruptRow { line: 3, .. })
        ));
    }
}
