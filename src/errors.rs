// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Every failure the ledger core can report. Commands wrap these in `anyhow`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount '{input}'")]
    InvalidAmount { input: String },

    #[error("Field '{field}' is required")]
    EmptyRequiredField { field: &'static str },

    #[error("No stored row matches {target} ({scanned} rows compared)")]
    NoMatchFound { target: String, scanned: usize },

    #[error("Store unavailable at {location}: {reason}")]
    StoreUnavailable { location: String, reason: String },

    #[error("Malformed row {position} in sheet '{sheet}': {reason}")]
    MalformedRow {
        sheet: String,
        position: usize,
        reason: String,
    },

    #[error("Invalid date '{input}', expected YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDate { input: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("Row {position} does not exist in sheet '{sheet}'")]
    RowOutOfRange { sheet: String, position: usize },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// User-input and data-quality outcomes; the caller shows them and carries on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount { .. }
                | LedgerError::EmptyRequiredField { .. }
                | LedgerError::NoMatchFound { .. }
                | LedgerError::MalformedRow { .. }
                | LedgerError::InvalidDate { .. }
                | LedgerError::InvalidField { .. }
        )
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
