//! Uniform result carrier for the read and write paths.

use crate::error::ScriptError;
use serde::Serialize;
use serde_json::Value;

/// JSON encoding of the decoded rows of a read.
#[derive(Debug)]
pub struct RowSet {
    buf: Vec<u8>,
}

impl RowSet {
    pub fn encode(rows: Vec<Value>) -> Result<Self, serde_json::Error> {
        let buf = serde_json::to_vec(&rows)?;
        Ok(RowSet { buf })
    }
}

#[derive(Serialize)]
struct SummaryBody {
    rows_affected: u64,
}

/// Outcome of a write: `{"rows_affected": n}`.
#[derive(Debug)]
pub struct WriteSummary {
    buf: Vec<u8>,
}

impl WriteSummary {
    pub fn encode(rows_affected: u64) -> Result<Self, serde_json::Error> {
        let buf = serde_json::to_vec(&SummaryBody { rows_affected })?;
        Ok(WriteSummary { buf })
    }
}

/// Exactly one of an error or a payload. Holds no connection or transaction.
#[derive(Debug)]
pub enum Scanner {
    Rows(RowSet),
    Summary(WriteSummary),
    Failed(ScriptError),
}

impl Scanner {
    pub fn error(&self) -> Option<&ScriptError> {
        match self {
            Scanner::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Scanner::Rows(r) => Some(&r.buf),
            Scanner::Summary(s) => Some(&s.buf),
            Scanner::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Vec<u8>, ScriptError> {
        match self {
            Scanner::Rows(r) => Ok(r.buf),
            Scanner::Summary(s) => Ok(s.buf),
            Scanner::Failed(e) => Err(e),
        }
    }

    /// Row-set scanner; an encoding failure becomes the error.
    pub fn rows(rows: Vec<Value>) -> Self {
        match RowSet::encode(rows) {
            Ok(set) => Scanner::Rows(set),
            Err(e) => Scanner::Failed(ScriptError::ResultEncoding(e)),
        }
    }
}

impl From<ScriptError> for Scanner {
    fn from(e: ScriptError) -> Self {
        Scanner::Failed(e)
    }
}
