//! `mst <infile> <outfile> <alpha>` — computes a minimum spanning tree with
//! a distributed Boruvka algorithm run over a tree of in-process workers.

use std::process::ExitCode;

use clap::Parser;
use mst_cli::cli::Cli;
use mst_cli::{logging, orchestrator};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match orchestrator::run(&cli.infile, &cli.outfile, cli.alpha).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "mst run failed");
            err.exit_code()
        }
    }
}
