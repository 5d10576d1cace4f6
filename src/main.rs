// ABOUTME: CLI entrypoint for qiita-export command
// ABOUTME: Handles error exit codes and wires config into the export run

use clap::Parser;
use qiita_export::{
    api::ApiClient, cli::Cli, config::ExportConfig, logging::init_logging, runner::run_export,
    Result,
};

fn main() {
    // A missing .env file is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();

    if let Err(e) = run() {
        eprintln!("qiita-export: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = ExportConfig::from_cli(&cli)?;
    let client = ApiClient::new(config.token, config.base_url)?.with_max_pages(config.max_pages);

    run_export(&client, &config.paths)?;

    Ok(())
}
