use crate::prelude::*;
use crate::record::{self, SheetRow, Status, StatusRecord};
use crate::storage::{Sheet, SheetHeader};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const DEFAULT_DAYS_TO_KEEP: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub timestamp: DateTime<Utc>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
}

/// Ingestion, read-back and retention over one sheet.
pub struct StatusLogService<S> {
    sheet: S,
    timezone: FixedOffset,
}

impl<S: Sheet> StatusLogService<S> {
    pub fn new(sheet: S, timezone: FixedOffset) -> Self {
        Self { sheet, timezone }
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Validates `status_param` and appends one row for it. Rejected input
    /// leaves the sheet untouched.
    pub async fn ingest(&self, status_param: Option<&str>) -> Result<IngestReceipt> {
        let status = Status::parse_param(status_param)?;
        self.ingest_at(status, record::now()).await
    }

    pub(crate) async fn ingest_at(
        &self,
        status: Status,
        timestamp: DateTime<Utc>,
    ) -> Result<IngestReceipt> {
        let record = StatusRecord::new(timestamp, status, &self.timezone);
        self.sheet.append_row(SheetRow::from(&record)).await?;

        info!(
            status = %status,
            timestamp = %record::format_timestamp(&timestamp),
            "Status logged"
        );
        Ok(IngestReceipt { timestamp, status })
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            timestamp: record::now(),
        }
    }

    /// Writes the styled header into row 0. Data rows are left as they are.
    pub async fn initialize(&self) -> Result<()> {
        self.sheet.write_header(&SheetHeader::styled()).await?;
        info!("Sheet initialized with headers");
        Ok(())
    }

    /// The last `limit` records, oldest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<StatusRecord>> {
        let count = self.sheet.row_count().await?;
        if count == 0 || limit == 0 {
            return Ok(Vec::new());
        }

        let start = count.saturating_sub(limit);
        self.sheet
            .read_rows(start, count - start)
            .await?
            .into_iter()
            .enumerate()
            .map(|(offset, row)| decode_row(row, start + offset))
            .collect()
    }

    /// Deletes the leading run of records older than `days_to_keep` days and
    /// returns how many were removed.
    ///
    /// Rows are expected in chronological order: the scan stops at the first
    /// row inside the retention window, so older rows after it are kept.
    pub async fn clean_old_data(&self, days_to_keep: u32) -> Result<usize> {
        self.clean_old_data_at(days_to_keep, Utc::now()).await
    }

    pub(crate) async fn clean_old_data_at(
        &self,
        days_to_keep: u32,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let count = self.sheet.row_count().await?;
        if count == 0 {
            return Ok(0);
        }

        // A window reaching past the earliest representable instant keeps everything.
        let Some(cutoff) = TimeDelta::try_days(i64::from(days_to_keep))
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return Ok(0);
        };
        let rows = self.sheet.read_rows(0, count).await?;

        let mut delete_count = 0;
        for (index, row) in rows.into_iter().enumerate() {
            if decode_row(row, index)?.timestamp < cutoff {
                delete_count += 1;
            } else {
                break;
            }
        }

        if delete_count > 0 {
            self.sheet.delete_rows(0, delete_count).await?;
            info!("Deleted {} old records", delete_count);
        }
        Ok(delete_count)
    }

    /// Runs [`clean_old_data`](Self::clean_old_data) every `interval` until the
    /// task is dropped.
    pub async fn start_cleanup_task(self: Arc<Self>, days_to_keep: u32, interval: Duration) {
        let mut interval = time::interval(interval);
        loop {
            interval.tick().await;
            if let Err(e) = self.clean_old_data(days_to_keep).await {
                error!("Failed to clean old records: {}", e);
            }
        }
    }
}

fn decode_row(row: SheetRow, index: usize) -> Result<StatusRecord> {
    StatusRecord::try_from(row).map_err(|reason| {
        crate::error::StorageError::CorruptRow {
            line: index + 2,
            reason,
        }
        .into()
    })
}
