// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Deletion by field equality. Sheets carry no row identifier, so a record is
//! located by comparing normalized fields against every stored row; the first
//! matching row wins. Field-identical rows are indistinguishable, and deleting
//! one removes whichever comes first in storage order.
//!
//! Positions are only valid until the sheet changes. Batch deletes are applied
//! highest position first so pending positions never shift, and each position
//! is re-read and re-matched right before it is deleted. A concurrent writer can
//! still move rows between that check and the delete; nothing here can rule
//! that out without a transactional store.

use crate::errors::{LedgerError, LedgerResult};
use crate::sheet::{Sheet, is_blank};
use std::fmt;

pub trait RowMatcher {
    type Key: fmt::Display;

    /// Comparable form of the in-memory record.
    fn target_key(&self) -> Self::Key;

    /// Comparable form of a stored row, read from raw cells. `None` if the row
    /// cannot be compared at all.
    fn stored_key(header: &[String], cells: &[String]) -> Option<Self::Key>;

    fn keys_match(target: &Self::Key, stored: &Self::Key) -> bool;
}

#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: usize,
    /// 1-indexed sheet positions, in the order they were removed.
    pub positions: Vec<usize>,
    /// One `NoMatchFound` per target that could not be located.
    pub warnings: Vec<LedgerError>,
}

impl DeleteReport {
    pub fn any_deleted(&self) -> bool {
        self.deleted > 0
    }
}

/// First data-row position (>= 2) whose stored key matches, skipping `claimed`.
pub fn find_position<T: RowMatcher>(
    rows: &[Vec<String>],
    key: &T::Key,
    claimed: &[usize],
) -> Option<usize> {
    let (header, data) = rows.split_first()?;
    data.iter().enumerate().find_map(|(i, cells)| {
        let position = i + 2;
        if claimed.contains(&position) || is_blank(cells) {
            return None;
        }
        T::stored_key(header, cells)
            .filter(|stored| T::keys_match(key, stored))
            .map(|_| position)
    })
}

fn matches_at<T: RowMatcher>(rows: &[Vec<String>], position: usize, key: &T::Key) -> bool {
    let Some((header, _)) = rows.split_first() else {
        return false;
    };
    match rows.get(position.wrapping_sub(1)) {
        Some(cells) if position >= 2 && !is_blank(cells) => {
            T::stored_key(header, cells).is_some_and(|stored| T::keys_match(key, &stored))
        }
        _ => false,
    }
}

/// Deletes one stored row per target. Targets with no match are reported as
/// warnings, never as errors.
pub fn delete_matching<S, T>(sheet: &mut S, targets: &[T]) -> LedgerResult<DeleteReport>
where
    S: Sheet + ?Sized,
    T: RowMatcher,
{
    let rows = sheet.rows()?;
    let scanned = rows.len().saturating_sub(1);
    let mut report = DeleteReport::default();

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    for (idx, target) in targets.iter().enumerate() {
        let key = target.target_key();
        let taken: Vec<usize> = claimed.iter().map(|(p, _)| *p).collect();
        match find_position::<T>(&rows, &key, &taken) {
            Some(position) => claimed.push((position, idx)),
            None => report.warnings.push(no_match(sheet.title(), &key, scanned)),
        }
    }

    claimed.sort_by(|a, b| b.0.cmp(&a.0));
    for (position, idx) in claimed {
        let key = targets[idx].target_key();
        let current = sheet.rows()?;
        let position = if matches_at::<T>(&current, position, &key) {
            Some(position)
        } else {
            log::warn!(
                "row {} of sheet '{}' changed since it was scanned; rescanning for {}",
                position,
                sheet.title(),
                key
            );
            find_position::<T>(&current, &key, &[])
        };
        match position {
            Some(position) => {
                sheet.delete_row(position)?;
                log::info!("deleted row {} of sheet '{}'", position, sheet.title());
                report.deleted += 1;
                report.positions.push(position);
            }
            None => report.warnings.push(no_match(
                sheet.title(),
                &key,
                current.len().saturating_sub(1),
            )),
        }
    }
    Ok(report)
}

fn no_match<K: fmt::Display>(sheet: &str, key: &K, scanned: usize) -> LedgerError {
    let err = LedgerError::NoMatchFound {
        target: format!("[{}] in sheet '{}'", key, sheet),
        scanned,
    };
    log::warn!("{}", err);
    err
}
