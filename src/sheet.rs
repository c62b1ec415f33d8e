// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tabular sheets without row identifiers. Row 1 is the header; positions are
//! 1-indexed and shift down after every delete. There is no update primitive.

use crate::errors::{LedgerError, LedgerResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub trait Sheet {
    fn title(&self) -> &str;

    /// Every row, header included, in storage order.
    fn rows(&self) -> LedgerResult<Vec<Vec<String>>>;

    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()>;

    /// Removes the row at a 1-indexed position.
    fn delete_row(&mut self, position: usize) -> LedgerResult<()>;

    fn row_count(&self) -> LedgerResult<usize> {
        Ok(self.rows()?.len())
    }

    /// Writes `header` when the sheet is empty. Returns the header in effect.
    fn ensure_header(&mut self, header: &[&str]) -> LedgerResult<Vec<String>> {
        let rows = self.rows()?;
        match rows.into_iter().next() {
            Some(existing) => Ok(existing),
            None => {
                let cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
                self.append_row(cells.clone())?;
                Ok(cells)
            }
        }
    }
}

impl<S: Sheet + ?Sized> Sheet for Box<S> {
    fn title(&self) -> &str {
        (**self).title()
    }
    fn rows(&self) -> LedgerResult<Vec<Vec<String>>> {
        (**self).rows()
    }
    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()> {
        (**self).append_row(cells)
    }
    fn delete_row(&mut self, position: usize) -> LedgerResult<()> {
        (**self).delete_row(position)
    }
    fn row_count(&self) -> LedgerResult<usize> {
        (**self).row_count()
    }
    fn ensure_header(&mut self, header: &[&str]) -> LedgerResult<Vec<String>> {
        (**self).ensure_header(header)
    }
}

/// A trailing row of empty cells is a blank spreadsheet line, not a record.
pub fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

pub fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|s| s.trim()).unwrap_or("")
}

#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    title: String,
    rows: Vec<Vec<String>>,
}

impl MemorySheet {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(title: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            title: title.to_string(),
            rows,
        }
    }
}

impl Sheet for MemorySheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn rows(&self) -> LedgerResult<Vec<Vec<String>>> {
        Ok(self.rows.clone())
    }

    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()> {
        self.rows.push(cells);
        Ok(())
    }

    fn delete_row(&mut self, position: usize) -> LedgerResult<()> {
        if position == 0 || position > self.rows.len() {
            return Err(LedgerError::RowOutOfRange {
                sheet: self.title.clone(),
                position,
            });
        }
        self.rows.remove(position - 1);
        Ok(())
    }
}

/// One `<title>.csv` file inside a workbook directory.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    title: String,
    path: PathBuf,
}

impl CsvSheet {
    pub fn open(dir: &Path, title: &str) -> Self {
        Self {
            title: title.to_string(),
            path: dir.join(format!("{}.csv", title)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, rows: &[Vec<String>]) -> LedgerResult<()> {
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut wtr = WriterBuilder::new().flexible(true).from_path(&tmp)?;
            for r in rows {
                wtr.write_record(r)?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Sheet for CsvSheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn rows(&self) -> LedgerResult<Vec<Vec<String>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut out = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            out.push(rec.iter().map(|s| s.to_string()).collect());
        }
        Ok(out)
    }

    fn append_row(&mut self, cells: Vec<String>) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        // files saved by spreadsheet tools may lack the final line break
        if file.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(file);
        wtr.write_record(&cells)?;
        wtr.flush()?;
        Ok(())
    }

    fn delete_row(&mut self, position: usize) -> LedgerResult<()> {
        let mut rows = self.rows()?;
        if position == 0 || position > rows.len() {
            return Err(LedgerError::RowOutOfRange {
                sheet: self.title.clone(),
                position,
            });
        }
        rows.remove(position - 1);
        self.write_all(&rows)
    }
}
