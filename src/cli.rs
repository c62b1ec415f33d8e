// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn tx_field_args(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("due").long("due").required(required).help("Due date (YYYY-MM-DD or DD/MM/YYYY)"))
        .arg(Arg::new("description").long("description").required(required))
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(required)
                .allow_hyphen_values(true)
                .help("Amount, e.g. 1.234,56 or 1234.56"),
        )
        .arg(Arg::new("kind").long("kind").required(required).help("in|out"))
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("contact").long("contact"))
        .arg(Arg::new("paid").long("paid").action(ArgAction::SetTrue))
}

pub fn build_cli() -> Command {
    Command::new("finsheet")
        .version(crate_version!())
        .about("Spreadsheet-backed personal ledger, credit cards and dashboard")
        .arg(
            Arg::new("workbook")
                .long("workbook")
                .global(true)
                .help("Workbook location (sqlite file or csv directory)"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .value_parser(["sqlite", "csv"]),
        )
        .subcommand(Command::new("init").about("Create the workbook sheets"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    tx_field_args(Command::new("add"), false)
                        .mut_arg("due", |a| a.required(true))
                        .mut_arg("description", |a| a.required(true))
                        .mut_arg("amount", |a| a.required(true))
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .conflicts_with("category")
                                .help("Record a purchase on a registered card"),
                        )
                        .arg(Arg::new("paid_on").long("paid-on")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("search").long("search").help("Match description or category"))
                        .arg(Arg::new("unpaid").long("unpaid").action(ArgAction::SetTrue))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    tx_field_args(Command::new("rm"), false).arg(
                        Arg::new("index")
                            .long("index")
                            .action(ArgAction::Append)
                            .value_parser(value_parser!(usize))
                            .conflicts_with_all(["due", "description", "amount"])
                            .help("Number shown by `tx list`; repeatable"),
                    ),
                )
                .subcommand(
                    Command::new("due")
                        .about("Unpaid transactions coming due")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(i64))
                                .default_value("7"),
                        )
                        .arg(Arg::new("ref_date").long("ref-date")),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("due_day").long("due-day")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("index")
                                .long("index")
                                .value_parser(value_parser!(usize))
                                .conflicts_with_all(["name", "limit"]),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(Arg::new("due_day").long("due-day")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Budget categories")
                .subcommand(Command::new("add").arg(Arg::new("name").long("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Monthly KPIs")
                .arg(Arg::new("ref_date").long("ref-date"))
                .arg(Arg::new("top").long("top").value_parser(value_parser!(usize))),
        ))
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Report data-quality problems"))
}
