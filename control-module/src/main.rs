mod cli;
mod client;
mod config;
mod formatter;
mod models;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{parse_args, Command, USAGE};
use client::ControlModule;
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so tables on stdout stay readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("control_module=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(command) => command,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = Config::from_env()?;
    let control = ControlModule::new(config);

    control.wait_for_services().await?;

    match command {
        Command::Interactive => cli::run_interactive(&control).await?,
        Command::Search { keyword, max_results } => cli::search_books(&control, &keyword, max_results).await,
        Command::Queries => cli::show_queries(&control).await?,
        Command::Analyze { selector } => cli::analyze(&control, &selector).await,
        Command::Help => {}
    }

    info!("Done");
    Ok(())
}
