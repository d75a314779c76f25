use clap::Parser;
use dtr_prune::{DtrClient, Pruner};
use dtr_prune_cli::cli::Cli;
use dtr_prune_cli::error::CliResult;
use dtr_prune_cli::output::render_report;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Returns whether every attempted deletion succeeded.
async fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    init_logging(cli.log_filter());

    let config = cli.resolve_config()?;
    tracing::debug!("Config loaded: {:?}", config);

    let client = DtrClient::from_config(&config.registry)?;

    // One reference date for the whole run
    let today = chrono::Local::now().date_naive();
    let pruner = Pruner::new(&client, config.retention, today).with_dry_run(!cli.prune);

    let report = pruner.run(&cli.namespace).await?;
    println!("{}", render_report(&report, cli.output_format())?);

    Ok(report.success())
}
