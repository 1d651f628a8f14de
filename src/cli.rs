// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    ]
}

fn today_arg() -> Arg {
    Arg::new("today")
        .long("today")
        .value_name("YYYY-MM-DD")
        .help("Evaluate as of this date instead of the local clock")
}

fn on_off(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(long).value_name("on|off").help(help)
}

fn transactions_cmd() -> Command {
    Command::new("tx")
        .about("Record, list and delete transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction (optionally split into installments)")
                .arg(Arg::new("description").long("description").short('d').required(true))
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .required(true)
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("category").long("category").short('c').required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Defaults to today"),
                )
                .arg(Arg::new("card").long("card").help("Card id"))
                .arg(Arg::new("due_date").long("due-date").value_name("YYYY-MM-DD"))
                .arg(
                    Arg::new("installments")
                        .long("installments")
                        .value_parser(value_parser!(u32))
                        .help("Split the amount into N monthly installments"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("search").long("search").short('s'))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("per_page")
                        .long("per-page")
                        .value_parser(value_parser!(usize))
                        .default_value("10"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").required(true)),
        )
}

fn cards_cmd() -> Command {
    Command::new("card")
        .about("Manage credit cards")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a card")
                .arg(Arg::new("name").long("name").short('n').required(true))
                .arg(Arg::new("limit").long("limit").short('l').required(true))
                .arg(
                    Arg::new("due_day")
                        .long("due-day")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(Arg::new("color").long("color")),
        )
        .subcommand(
            Command::new("list")
                .about("List cards with used and available limit")
                .args(json_args()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a card (its transactions are kept)")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("installments")
                .about("Show upcoming installments charged to a card")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("as_of").long("as-of").value_name("YYYY-MM-DD"))
                .args(json_args()),
        )
}

fn reports_cmd() -> Command {
    let year = || {
        Arg::new("year")
            .long("year")
            .short('y')
            .value_parser(value_parser!(i32))
            .help("Defaults to the newest year with transactions")
    };
    let period = || {
        [
            year(),
            Arg::new("month")
                .long("month")
                .short('m')
                .help("1-12; omit for the whole year"),
        ]
    };
    Command::new("report")
        .about("Analytics over a period")
        .subcommand_required(true)
        .subcommand(
            Command::new("kpis")
                .about("Income, expenses, net result and savings rate")
                .args(period())
                .args(json_args()),
        )
        .subcommand(
            Command::new("categories")
                .about("Expenses by category")
                .args(period())
                .args(json_args()),
        )
        .subcommand(
            Command::new("top")
                .about("Largest expenses")
                .args(period())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .value_parser(value_parser!(usize))
                        .default_value("5"),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("monthly")
                .about("Income, expenses and net per month")
                .arg(year())
                .args(json_args()),
        )
        .subcommand(
            Command::new("daily")
                .about("Income and expenses per day of a month")
                .args(period())
                .args(json_args()),
        )
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Income and notification settings")
        .subcommand_required(true)
        .subcommand(Command::new("show").args(json_args()))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("salary").long("salary"))
                .arg(
                    Arg::new("salary_day")
                        .long("salary-day")
                        .value_parser(value_parser!(u32)),
                )
                .arg(on_off("notifications", "notifications", "Enable due-date notifications"))
                .arg(
                    Arg::new("days_before_due")
                        .long("days-before-due")
                        .value_name("1,2,3"),
                )
                .arg(on_off("notify_due_dates", "notify-due-dates", "Alert on due dates"))
                .arg(on_off("notify_low_balance", "notify-low-balance", "Alert on low balance"))
                .arg(on_off(
                    "notify_high_expenses",
                    "notify-high-expenses",
                    "Alert on high expenses",
                )),
        )
        .subcommand(
            Command::new("extra")
                .about("Recurring extra income")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("clear")),
        )
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .version(crate_version!())
        .about("Personal finance tracking: transactions, credit cards, analytics and backups")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite file to use instead of the platform data dir"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("dashboard")
                .about("Balance, this month's totals, recent transactions and alerts")
                .arg(today_arg())
                .arg(
                    Arg::new("watch")
                        .long("watch")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Refresh every SECS seconds"),
                )
                .args(json_args()),
        )
        .subcommand(transactions_cmd())
        .subcommand(cards_cmd())
        .subcommand(reports_cmd())
        .subcommand(
            Command::new("alerts")
                .about("Card and transaction due-date alerts")
                .arg(today_arg())
                .args(json_args()),
        )
        .subcommand(settings_cmd())
        .subcommand(
            Command::new("backup")
                .about("Export or restore all data as one JSON document")
                .subcommand_required(true)
                .subcommand(
                    Command::new("export").arg(
                        Arg::new("out")
                            .long("out")
                            .help("Defaults to pocketbook-backup-YYYY-MM-DD.json"),
                    ),
                )
                .subcommand(
                    Command::new("import").arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions as CSV or JSON")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("format").long("format").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}
