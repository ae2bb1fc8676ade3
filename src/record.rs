use crate::error::StatusError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Display format of the third sheet column.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Status {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Exact, case-sensitive match against `ON` / `OFF`.
    pub fn parse_param(param: Option<&str>) -> Result<Self, StatusError> {
        match param {
            Some(value) => value.parse(),
            None => Err(StatusError::Invalid(None)),
        }
    }
}

impl FromStr for Status {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(StatusError::Invalid(Some(other.to_string()))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub status: Status,
    #[serde(rename = "formatted")]
    pub formatted_timestamp: String,
}

impl StatusRecord {
    pub fn new(timestamp: DateTime<Utc>, status: Status, timezone: &FixedOffset) -> Self {
        Self {
            timestamp,
            status,
            formatted_timestamp: format_display(&timestamp, timezone),
        }
    }
}

/// The three cells of a data row as they are persisted:
/// raw timestamp, status, formatted timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow(pub String, pub String, pub String);

impl From<&StatusRecord> for SheetRow {
    fn from(record: &StatusRecord) -> Self {
        SheetRow(
            format_timestamp(&record.timestamp),
            record.status.as_str().to_string(),
            record.formatted_timestamp.clone(),
        )
    }
}

impl TryFrom<SheetRow> for StatusRecord {
    type Error = String;

    fn try_from(row: SheetRow) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&row.0)
            .map_err(|e| format!("bad timestamp {:?}: {}", row.0, e))?;
        let status = row
            .1
            .parse::<Status>()
            .map_err(|_| format!("bad status {:?}", row.1))?;
        Ok(StatusRecord {
            timestamp,
            status,
            formatted_timestamp: row.2,
        })
    }
}

/// Current time at the precision the sheet keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

pub fn format_display(timestamp: &DateTime<Utc>, timezone: &FixedOffset) -> String {
    timestamp
        .with_timezone(timezone)
        .format(DISPLAY_FORMAT)
        .to_string()
}

pub fn parse_display(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT)
}

pub fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(timestamp))
}
