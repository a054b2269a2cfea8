use anyhow::Context;
use clap::{Parser, Subcommand};
use locallib_kernel::settings::Settings;

/// LocalLibrary catalog
#[derive(Debug, Parser)]
#[command(name = "locallib", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server until Ctrl-C
    Serve,
    /// Populate the store with sample authors, genres, books and copies
    Seed {
        /// Store endpoint, overriding `database.endpoint`
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command {
        Command::Serve => {
            locallib_telemetry::init(&settings.telemetry)?;
            locallib_app::run(settings).await
        }
        Command::Seed { endpoint } => {
            locallib_telemetry::init(&settings.telemetry)?;
            if let Some(endpoint) = endpoint {
                settings.database.endpoint = endpoint;
            }
            let catalog = locallib_app::open_catalog(&settings).await?;
            let report = locallib_app::seed::seed(&catalog).await?;
            if report.skipped {
                println!("catalog already has books; nothing seeded");
            } else {
                println!(
                    "seeded {} authors, {} genres, {} books, {} copies into {}",
                    report.authors,
                    report.genres,
                    report.books,
                    report.copies,
                    settings.database.endpoint
                );
            }
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
