//! CLI entry point.
//!
//! Loads `.env`, parses arguments, builds the [`CliConfig`] and hands the
//! command to the handlers. Output goes to stdout, logs and errors to stderr.

use clap::Parser;

use notiflow_cli::{Cli, CliConfig, CliError, dispatch, init_tracing};

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_env(cli.server_url.as_deref())?;
    let output = dispatch(&cli.command, &config, cli.compact)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
