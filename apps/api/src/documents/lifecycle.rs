//! Document parsing lifecycle.
//!
//! `NOT_STARTED → STARTED → {PARSED | ERROR}`, with `ERROR → STARTED` only on an
//! explicit new invocation. `ParsingState` is the only in-memory representation;
//! the status string exists solely at the row boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::document::DocumentRow;
use crate::models::profile::{Analysis, Content};

/// Persisted status column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParsingStatus {
    NotStarted,
    Started,
    Parsed,
    Error,
}

impl ParsingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingStatus::NotStarted => "NOT_STARTED",
            ParsingStatus::Started => "STARTED",
            ParsingStatus::Parsed => "PARSED",
            ParsingStatus::Error => "ERROR",
        }
    }

    /// States a new invocation may claim.
    pub fn is_claimable(&self) -> bool {
        matches!(self, ParsingStatus::NotStarted | ParsingStatus::Error)
    }
}

impl fmt::Display for ParsingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParsingStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_STARTED" => Ok(ParsingStatus::NotStarted),
            "STARTED" => Ok(ParsingStatus::Started),
            "PARSED" => Ok(ParsingStatus::Parsed),
            "ERROR" => Ok(ParsingStatus::Error),
            other => Err(LifecycleError::UnknownStatus(other.to_string())),
        }
    }
}

/// Lifecycle state with the data each state carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsingState {
    NotStarted,
    Started,
    Parsed { content: Content, analysis: Analysis },
    Error { message: Option<String> },
}

impl ParsingState {
    pub fn status(&self) -> ParsingStatus {
        match self {
            ParsingState::NotStarted => ParsingStatus::NotStarted,
            ParsingState::Started => ParsingStatus::Started,
            ParsingState::Parsed { .. } => ParsingStatus::Parsed,
            ParsingState::Error { .. } => ParsingStatus::Error,
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("unknown parsing status '{0}'")]
    UnknownStatus(String),

    #[error("document {id} is PARSED but has no {missing}")]
    MissingResult { id: Uuid, missing: &'static str },

    #[error("document {id} is {status} but carries parsed results")]
    UnexpectedResult { id: Uuid, status: ParsingStatus },

    #[error("document {id} has malformed stored {field}: {source}")]
    MalformedResult {
        id: Uuid,
        field: &'static str,
        source: serde_json::Error,
    },
}

/// A résumé document and its lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub storage_key: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub state: ParsingState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn status(&self) -> ParsingStatus {
        self.state.status()
    }

    pub fn locator(&self) -> DocumentLocator<'_> {
        DocumentLocator {
            storage_key: &self.storage_key,
            file_type: &self.file_type,
        }
    }
}

/// Where the raw bytes live and how to decode them.
#[derive(Debug, Clone, Copy)]
pub struct DocumentLocator<'a> {
    pub storage_key: &'a str,
    pub file_type: &'a str,
}

impl TryFrom<DocumentRow> for Document {
    type Error = LifecycleError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let status: ParsingStatus = row.status.parse()?;
        let id = row.id;

        let state = match status {
            ParsingStatus::Parsed => {
                let content = row.content.ok_or(LifecycleError::MissingResult {
                    id,
                    missing: "content",
                })?;
                let analysis = row.analysis.ok_or(LifecycleError::MissingResult {
                    id,
                    missing: "analysis",
                })?;
                ParsingState::Parsed {
                    content: serde_json::from_value(content).map_err(|source| {
                        LifecycleError::MalformedResult {
                            id,
                            field: "content",
                            source,
                        }
                    })?,
                    analysis: serde_json::from_value(analysis).map_err(|source| {
                        LifecycleError::MalformedResult {
                            id,
                            field: "analysis",
                            source,
                        }
                    })?,
                }
            }
            other if row.content.is_some() || row.analysis.is_some() => {
                return Err(LifecycleError::UnexpectedResult { id, status: other });
            }
            ParsingStatus::NotStarted => ParsingState::NotStarted,
            ParsingStatus::Started => ParsingState::Started,
            ParsingStatus::Error => ParsingState::Error {
                message: row.error_message,
            },
        };

        Ok(Document {
            id,
            user_id: row.user_id,
            storage_key: row.storage_key,
            file_name: row.file_name,
            file_type: row.file_type,
            file_size: row.file_size,
            state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
