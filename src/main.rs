use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use goal_tracker::api::{self, GoalFilter, SecurityConfig};
use goal_tracker::render::render_goal_list;
use goal_tracker::store::{GoalStore, DEFAULT_DATA_FILE};

#[derive(Parser)]
#[command(name = "goal-tracker")]
#[command(about = "Track short- and long-term personal goals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// JSON file holding the goals
        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,
    },
    /// Print goals, optionally filtered
    List {
        /// Only goals of this type (ShortTerm or LongTerm)
        #[arg(long = "type")]
        goal_type: Option<String>,

        /// Only goals with this status (Active or Completed)
        #[arg(long)]
        status: Option<String>,

        /// JSON file holding the goals
        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "goal_tracker=debug,tower_http=debug".into()),
    );

    // Logs go to stderr so `list` output stays clean on stdout
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(port: u16, store: GoalStore, security: SecurityConfig) -> anyhow::Result<()> {
    tracing::info!("Starting goal tracker on port {}", port);

    if !security.csrf {
        tracing::warn!("Anti-forgery checks are disabled");
    }

    let app = api::create_router(store, security);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Goal tracker listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port, data_file }) => {
            serve(port, GoalStore::open(data_file)?, SecurityConfig::from_env()).await?
        }
        Some(Commands::List {
            goal_type,
            status,
            data_file,
        }) => {
            let filter = GoalFilter::parse(goal_type.as_deref(), status.as_deref())
                .map_err(anyhow::Error::msg)?;
            let store = GoalStore::open(data_file)?;
            let list = api::build_goal_list(store.get_all(), filter, Local::now().date_naive());
            print!("{}", render_goal_list(&list));
        }
        None => serve(3000, GoalStore::open_default()?, SecurityConfig::default()).await?,
    }

    Ok(())
}
