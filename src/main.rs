//
//  gerrit-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gerrit_cli::cli::Cli;
use gerrit_cli::exit_codes;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.global.verbose);

    match cli.command.run(&cli.global).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging from `GERRITCTL_LOG`, falling back to `warn`
/// (`debug` for this crate with `--verbose`).
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,gerrit_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GERRITCTL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
