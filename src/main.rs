use clap::Parser;
use tracing_subscriber::EnvFilter;

use bdd_lab::cli::commands::{cmd_check, cmd_report, cmd_run, cmd_steps};
use bdd_lab::cli::config::{Cli, Commands, load_config};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "bdd_lab=info",
        1 => "bdd_lab=debug",
        _ => "bdd_lab=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    let ok = match cli.command {
        Commands::Run(args) => cmd_run(&args, &config)?,
        Commands::Check { features, tags } => cmd_check(features.as_deref(), &tags, &config)?,
        Commands::Steps => {
            cmd_steps()?;
            true
        }
        Commands::Report {
            json,
            format,
            output,
        } => cmd_report(&json, format, output.as_deref(), &config)?,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
