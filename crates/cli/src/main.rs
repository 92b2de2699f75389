use anyhow::Context;
use bookshelf_kernel::settings::{DatabaseSettings, Settings, StoreBackend};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about = "Bookshelf service command-line interface")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to bind, overrides `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
        /// Keep books in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },
    /// Print the effective settings as JSON
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load bookshelf settings")?;

    match cli.command {
        Command::Serve { host, port, memory } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if memory {
                settings.database = DatabaseSettings {
                    backend: StoreBackend::Memory,
                    ..settings.database
                };
            }

            bookshelf_app::run(settings).await
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
