use barcoder::cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("barcoder=debug,info")
    } else {
        EnvFilter::new("barcoder=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Demultiplex(args) => {
            cli::demultiplex::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Barcodes(args) => {
            cli::barcodes::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
