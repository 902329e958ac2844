use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_feedback::{api, config::ServerConfig};

#[derive(Parser)]
#[command(name = "session-feedback")]
#[command(about = "Record-keeping service for game sessions and their feedback")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ServerConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "session_feedback=debug,tower_http=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = config.open_database()?;
    let app = api::create_router(db);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Session feedback server listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Migrate) => {
            cli.config.open_database()?;
            tracing::info!("Migrations applied");
        }
        Some(Commands::Serve) | None => serve(cli.config).await?,
    }

    Ok(())
}
