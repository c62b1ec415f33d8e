// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use finsheet::{cli, commands, config::Settings, db::Workbook, session};

fn main() -> Result<()> {
    env_logger::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut settings = Settings::load()?;
    settings.apply_overrides(
        matches.get_one::<String>("workbook").cloned(),
        matches.get_one::<String>("backend").cloned(),
    )?;
    let book = Workbook::open(&settings)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            session::ledger(&book, &settings).init()?;
            session::cards(&book, &settings).init()?;
            session::categories(&book, &settings).seed(&settings.default_categories)?;
            println!("Workbook initialized at {}", book.location());
        }
        Some(("tx", sub)) => commands::transactions::handle(&book, &settings, sub)?,
        Some(("card", sub)) => commands::cards::handle(&book, &settings, sub)?,
        Some(("category", sub)) => commands::categories::handle(&book, &settings, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&book, &settings, sub)?,
        Some(("import", sub)) => commands::importer::handle(&book, &settings, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&book, &settings, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&book, &settings)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
