use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use transfer::config::{self, ConfigOverrides};
use transfer::output;
use transfer::upload;

#[derive(Parser)]
#[command(name = "transfer")]
#[command(version, about = "Upload files to transfer.sh-compatible services")]
struct Cli {
    /// File or directory to upload
    filepath: PathBuf,

    /// Service URL
    #[arg(long)]
    url: Option<String>,

    /// Basic auth username
    #[arg(long)]
    user: Option<String>,

    /// Basic auth password
    #[arg(long)]
    pass: Option<String>,

    /// Maximum amount of downloads
    #[arg(long)]
    downloads: Option<u32>,

    /// Maximum amount of days
    #[arg(long)]
    days: Option<u32>,

    /// Name of file when uploaded
    #[arg(long)]
    filename: Option<String>,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        url: cli.url,
        user: cli.user,
        pass: cli.pass,
        downloads: cli.downloads,
        days: cli.days,
    };

    let config = config::apply_overrides(config::load_config()?, &overrides);
    config.validate()?;

    let outcome = upload::send_path(&config, &cli.filepath, cli.filename)?;
    output::print_result(&outcome.result);

    // A failed temp-archive removal still exits nonzero, after the links print.
    if let Some(cleanup) = outcome.cleanup_error {
        return Err(cleanup.into());
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
