// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pocketbook::store::SqliteStore;
use pocketbook::{cli, commands, db};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_path = matches.get_one::<String>("db").map(PathBuf::from);
    let store = SqliteStore::new(db::open_or_init(db_path.as_deref())?)?;

    match matches.subcommand() {
        Some(("init", _)) => match db_path {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("card", sub)) => commands::cards::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&store, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
