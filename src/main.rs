use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library::{api, db};

#[derive(Parser)]
#[command(name = "library")]
#[command(about = "Library catalog of books and their authors")]
struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "LIBRARY_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the catalog server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the HTTP server
        #[arg(short, long, default_value = "5002")]
        port: u16,
    },
    /// Create the database tables and exit
    Init,
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(db: db::Database, host: &str, port: u16) -> anyhow::Result<()> {
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Library server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "library=debug,library_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let db = open_database(cli.db)?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            tracing::info!("Starting library server on port {}", port);
            serve(db, &host, port).await?;
        }
        Some(Commands::Init) => {
            println!("Database tables created or already exist.");
        }
        None => {
            tracing::info!("Starting library server on port 5002");
            serve(db, "127.0.0.1", 5002).await?;
        }
    }

    Ok(())
}
