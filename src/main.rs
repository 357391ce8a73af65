use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aakkai_portal::{
    api,
    auth::{AdminAllowList, AuthContext, OAuthProvider, SessionResolver, SupabaseAuth},
    config::PortalConfig,
    db, seed,
};

#[derive(Parser)]
#[command(name = "aakkai")]
#[command(about = "Team portal backend for the Aakkai design studio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Create or update the database schema
    Migrate,
    /// Insert starter testimonials and team profiles into an empty store
    Seed,
    /// Print the URL that starts an OAuth sign-in
    Login {
        #[arg(long, default_value = "google")]
        provider: String,
        #[arg(long)]
        redirect_to: Option<String>,
    },
    /// Resolve the role and profile behind an access token
    Whoami {
        #[arg(long, env = "AAKKAI_ACCESS_TOKEN")]
        token: String,
    },
}

fn open_database(config: &PortalConfig) -> anyhow::Result<db::Database> {
    let db = match &config.database.path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

fn resolver(config: &PortalConfig, db: &db::Database) -> SessionResolver {
    let allow_list = AdminAllowList::new(&config.auth.admin_emails);
    if allow_list.is_empty() {
        tracing::warn!("No admin emails configured; every sign-in resolves to team_member");
    }
    SessionResolver::new(allow_list, Arc::new(db.clone()))
}

async fn serve(config: PortalConfig, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);
    tracing::info!("Starting Aakkai portal on port {}", port);

    let db = open_database(&config)?;
    let state = api::AppState {
        resolver: resolver(&config, &db),
        provider: Arc::new(SupabaseAuth::new(&config.supabase)?),
        redirect_to: config.auth.redirect_to.clone(),
        db,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, port)).await?;
    tracing::info!(
        "Aakkai portal listening on http://{}:{}",
        config.server.host,
        port
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "aakkai_portal=debug,aakkai_core=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::load()?;

    match cli.command {
        Some(Commands::Serve { port }) => serve(config, port).await?,
        Some(Commands::Migrate) => {
            open_database(&config)?;
            println!("Database schema is up to date");
        }
        Some(Commands::Seed) => {
            let db = open_database(&config)?;
            let report = seed::seed(&db)?;
            println!(
                "Seeded {} testimonials and {} team profiles",
                report.testimonials, report.profiles
            );
        }
        Some(Commands::Login {
            provider,
            redirect_to,
        }) => {
            let provider = OAuthProvider::from_str(&provider)
                .ok_or_else(|| anyhow::anyhow!("Unsupported provider '{}'", provider))?;
            let auth = SupabaseAuth::new(&config.supabase)?;
            let db = open_database(&config)?;
            let mut context = AuthContext::new(Arc::new(auth), resolver(&config, &db));
            let redirect_to = redirect_to.unwrap_or_else(|| config.auth.redirect_to.clone());
            let url = context.begin_sign_in(provider, &redirect_to)?;
            println!("Open this URL to sign in:\n{}", url);
            println!("Then run `aakkai whoami --token <access_token>` with the token from the redirect.");
        }
        Some(Commands::Whoami { token }) => {
            let auth = SupabaseAuth::new(&config.supabase)?;
            let db = open_database(&config)?;
            let mut context = AuthContext::new(Arc::new(auth), resolver(&config, &db));
            let state = context.complete_sign_in(&token).await?;
            println!("{}", serde_json::to_string_pretty(state)?);
        }
        None => serve(config, None).await?,
    }

    Ok(())
}
