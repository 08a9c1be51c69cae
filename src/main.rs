mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// foodgram - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Recipe sharing API with short links", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Load reference data from CSV
    Import {
        #[arg(value_enum)]
        kind: cli::import::Kind,

        /// Header-less CSV file
        path: String,
    },
    /// Grant or revoke superuser rights
    User {
        #[arg(value_enum)]
        role: cli::user::Role,

        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = foodgram::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    foodgram::observability::init(&config.observability.log_level, config.observability.json)?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::Reset => cli::migrate::reset(&config).await,
        Commands::Import { kind, path } => cli::import::run(&config, kind, path).await,
        Commands::User { role, email } => cli::user::set_role(&config, email, role).await,
    }
}
