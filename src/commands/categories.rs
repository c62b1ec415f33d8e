// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::db::Workbook;
use crate::session;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(book: &Workbook, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let mut registry = session::categories(book, settings);
    registry.seed(&settings.default_categories)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if registry.add(name)? {
                println!("Added category '{}'", name.trim());
            } else {
                println!("Category '{}' already exists", name.trim());
            }
        }
        Some(("list", _)) => {
            let data = registry.list()?.into_iter().map(|c| vec![c]).collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if registry.remove(name)? {
                println!("Removed category '{}'", name.trim());
            } else {
                eprintln!("warning: category '{}' not found", name.trim());
            }
        }
        _ => {}
    }
    Ok(())
}
