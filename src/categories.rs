// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::sheet::{Sheet, cell};

pub const HEADER: [&str; 1] = ["Name"];

/// User-defined budget categories, one per row.
pub struct CategoryRegistry<S: Sheet> {
    sheet: S,
}

impl<S: Sheet> CategoryRegistry<S> {
    pub fn new(sheet: S) -> Self {
        Self { sheet }
    }

    /// Writes the defaults into a sheet that has never been used.
    pub fn seed(&mut self, defaults: &[String]) -> LedgerResult<()> {
        if self.sheet.row_count()? > 0 {
            return Ok(());
        }
        self.sheet.ensure_header(&HEADER)?;
        for name in defaults {
            self.sheet.append_row(vec![name.trim().to_string()])?;
        }
        Ok(())
    }

    pub fn list(&self) -> LedgerResult<Vec<String>> {
        Ok(self
            .sheet
            .rows()?
            .iter()
            .skip(1)
            .map(|cells| cell(cells, 0).to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }

    /// Case-insensitive membership. An empty registry knows no categories.
    pub fn contains(&self, name: &str) -> LedgerResult<bool> {
        let name = name.trim().to_lowercase();
        Ok(self.list()?.iter().any(|c| c.to_lowercase() == name))
    }

    /// Returns false when the name already exists (case-insensitive).
    pub fn add(&mut self, name: &str) -> LedgerResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyRequiredField { field: "name" });
        }
        if self.contains(name)? {
            return Ok(false);
        }
        self.sheet.ensure_header(&HEADER)?;
        self.sheet.append_row(vec![name.to_string()])?;
        Ok(true)
    }

    /// Removes the first row named `name`.
    pub fn remove(&mut self, name: &str) -> LedgerResult<bool> {
        let name = name.trim();
        let position = self
            .sheet
            .rows()?
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, cells)| cell(cells, 0) == name)
            .map(|(i, _)| i + 1);
        match position {
            Some(p) => {
                self.sheet.delete_row(p)?;
                Ok(true)
            }
            None => {
                log::warn!("category '{}' not found in '{}'", name, self.sheet.title());
                Ok(false)
            }
        }
    }
}
