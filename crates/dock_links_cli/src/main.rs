//! CLI smoke probe for `dock_links_core`.
//!
//! # Responsibility
//! - Open the link store under an extension root and print its links.
//! - Write core diagnostics to `<extension-root>/logs`.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `dock_links_cli <absolute-extension-root>`

use dock_links_core::{default_log_level, init_logging, LinkStore, LinkStoreConfig, StoreError};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("dock_links_core version={}", dock_links_core::core_version());

    let Some(root) = std::env::args_os().nth(1) else {
        eprintln!("usage: dock_links_cli <absolute-extension-root>");
        return ExitCode::from(2);
    };

    match print_links(LinkStoreConfig::new(root)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error code={} message={err}", err.code());
            ExitCode::FAILURE
        }
    }
}

fn print_links(config: LinkStoreConfig) -> Result<(), StoreError> {
    let mut store = LinkStore::new(config)?;
    start_logging(&store);
    store.ensure_storage_ready()?;
    let database = store.open_or_create()?;

    println!("data_dir={}", store.paths().data_dir().display());
    println!("db_file={}", store.paths().db_file().display());
    println!("state={} id={} links={}", store.state(), database.id, database.len());
    for record in database.iter() {
        println!("{}\t{}", record.order, record.target);
    }
    Ok(())
}

/// Logging is best effort: a probe run still prints links without it.
fn start_logging(store: &LinkStore) {
    let log_dir = store.config().extension_root.join("logs");
    let Some(log_dir) = log_dir.to_str() else {
        eprintln!("logging disabled: non UTF-8 log dir `{}`", log_dir.display());
        return;
    };
    if let Err(err) = init_logging(default_log_level(), log_dir) {
        eprintln!("logging disabled: {err}");
    }
}
