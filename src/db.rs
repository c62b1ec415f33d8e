// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Backend, Settings};
use crate::errors::{LedgerError, LedgerResult};
use crate::sheet::{CsvSheet, Sheet};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

/// An open workbook: a set of titled sheets behind one backend.
pub enum Workbook {
    Sqlite { conn: Connection, location: String },
    Csv { dir: PathBuf },
}

impl Workbook {
    pub fn open(settings: &Settings) -> LedgerResult<Workbook> {
        let location = settings
            .workbook_location()
            .map_err(|e| LedgerError::StoreUnavailable {
                location: "<default>".into(),
                reason: e.to_string(),
            })?;
        match settings.backend {
            Backend::Sqlite => Workbook::open_sqlite(&location),
            Backend::Csv => Workbook::open_csv(&location),
        }
    }

    pub fn open_sqlite(path: &Path) -> LedgerResult<Workbook> {
        let unavailable = |e: rusqlite::Error| LedgerError::StoreUnavailable {
            location: path.display().to_string(),
            reason: e.to_string(),
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        init_schema(&conn).map_err(unavailable)?;
        log::debug!("opened sqlite workbook at {}", path.display());
        Ok(Workbook::Sqlite {
            conn,
            location: path.display().to_string(),
        })
    }

    pub fn open_csv(dir: &Path) -> LedgerResult<Workbook> {
        fs::create_dir_all(dir).map_err(|e| LedgerError::StoreUnavailable {
            location: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if !dir.is_dir() {
            return Err(LedgerError::StoreUnavailable {
                location: dir.display().to_string(),
                reason: "not a directory".into(),
            });
        }
        log::debug!("opened csv workbook at {}", dir.display());
        Ok(Workbook::Csv {
            dir: dir.to_path_buf(),
        })
    }

    pub fn in_memory() -> LedgerResult<Workbook> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Workbook::Sqlite {
            conn,
            location: ":memory:".into(),
        })
    }

    pub fn location(&self) -> String {
        match self {
            Workbook::Sqlite { location, .. } => location.clone(),
            Workbook::Csv { dir } => dir.display().to_string(),
        }
    }

    pub fn sheet(&self, title: &str) -> Box<dyn Sheet + '_> {
        match self {
            Workbook::Sqlite { conn, .. } => Box::new(SqliteSheet::new(conn, title)),
            Workbook::Csv { dir } => Box::new(CsvSheet::open(dir, title)),
        }
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS sheet_rows(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sheet TEXT NOT NULL,
        cells TEXT NOT NULL -- JSON array of strings
    );
    CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows(sheet, id);
    "#,
    )
}

/// A sheet stored as ordered rows of one SQLite table. The physical rowid is
/// never exposed; callers only see positions.
pub struct SqliteSheet<'c> {
    conn: &'c Connection,
    title: String,
}

impl<'c> SqliteSheet<'c> {
    pub fn new(conn: &'c Connection, title: &str) -> Self {
        Self {
            conn,
            title: title.to_string(),
        }
    }
}

impl Sheet for SqliteSheet<'_> {
    fn title(&self) -> &str {
        &self.title
    }

    /// A cell blob that does not decode reads as a blank row, so positions
    /// still line up with the table.
    fn rows(&self) -> LedgerResult<Vec<Vec<String>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, cells FROM sheet_rows WHERE sheet=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![self.title], |r| {
            Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(cells) => out.push(cells),
                Err(e) => {
                    log::warn!(
                        "row {} of sheet '{}' (id {}) is unreadable and treated as blank: {}",
                        out.len() + 1,
                        self.title,
                        id,
                        e
                    );
                    out.push(Vec::new());
                }
            }
        }
        Ok(out)
    }

    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO sheet_rows(sheet, cells) VALUES (?1, ?2)",
            params![self.title, serde_json::to_string(&cells)?],
        )?;
        Ok(())
    }

    fn delete_row(&mut self, position: usize) -> LedgerResult<()> {
        let out_of_range = || LedgerError::RowOutOfRange {
            sheet: self.title.clone(),
            position,
        };
        if position == 0 {
            return Err(out_of_range());
        }
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM sheet_rows WHERE sheet=?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![self.title, (position - 1) as i64],
                |r| r.get(0),
            )
            .optional()?;
        let id = id.ok_or_else(out_of_range)?;
        self.conn
            .execute("DELETE FROM sheet_rows WHERE id=?1", params![id])?;
        Ok(())
    }

    fn row_count(&self) -> LedgerResult<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sheet_rows WHERE sheet=?1",
            params![self.title],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }
}
