use anyhow::Result;
use clap::Parser;
use irc_logger::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(level) = cli.log {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(level.to_string()))
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(err) = irc_logger::run(&cli) {
        tracing::error!(%err, "fatal");
        return Err(err.into());
    }
    Ok(())
}
