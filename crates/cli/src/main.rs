//! `clientgen` binary.

use clap::Parser;
use clientgen_cli::{Cli, init_tracing, run_cli_async};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();
    std::process::exit(run_cli_async(cli).await);
}
