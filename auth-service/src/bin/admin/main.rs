use anyhow::Context;
use auth_service::config::Config;
use auth_service::config::StoreBackend;
use auth_service::credential::models::AccountKind;
use auth_service::credential::models::AccountStatus;
use auth_service::credential::models::Handle;
use auth_service::credential::models::SessionToken;
use auth_service::credential::ports::AuthServicePort;
use auth_service::credential::service::AuthService;
use auth_service::stores;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Operator tool for the credential store.
#[derive(Debug, Parser)]
#[command(name = "auth-admin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account
    Register {
        handle: String,
        password: String,
        #[arg(long, value_parser = parse_kind, default_value = "user")]
        kind: AccountKind,
    },

    /// Authenticate and print the issued session as JSON
    Login {
        handle: String,
        password: String,
        /// Only sign in if the account is of this kind
        #[arg(long, value_parser = parse_kind)]
        kind: Option<AccountKind>,
    },

    /// Change the lifecycle status of an account
    SetStatus {
        handle: String,
        #[arg(value_parser = parse_status)]
        status: AccountStatus,
    },

    /// Revoke a session token
    Revoke { token: String },
}

fn parse_kind(raw: &str) -> Result<AccountKind, String> {
    raw.parse::<AccountKind>().map_err(|e| e.to_string())
}

fn parse_status(raw: &str) -> Result<AccountStatus, String> {
    raw.parse::<AccountStatus>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    tracing::info!(
        backend = ?config.store.backend,
        session_ttl_seconds = config.session.ttl_seconds,
        "Configuration loaded"
    );
    if config.store.backend == StoreBackend::Memory {
        tracing::warn!("In-memory store selected; nothing outlives this process");
    }

    let store = stores::connect(&config)
        .await
        .context("Failed to open credential store")?;
    let service = AuthService::new(store.clone(), config.auth_policy())?;

    match cli.command {
        Command::Register {
            handle,
            password,
            kind,
        } => {
            let record = service.register_as(&handle, &password, kind).await?;
            println!("{}", record.id);
        }
        Command::Login {
            handle,
            password,
            kind,
        } => {
            let session = match kind {
                Some(kind) => service.authenticate_as(&handle, &password, kind).await?,
                None => service.authenticate(&handle, &password).await?,
            };
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Command::SetStatus { handle, status } => {
            let handle = Handle::parse(&handle)?;
            let record = store
                .find_by_handle(&handle)
                .await
                .with_context(|| format!("No account for handle {}", handle))?;
            service.set_account_status(&record.id, status).await?;
        }
        Command::Revoke { token } => {
            service.logout(&SessionToken::new(token)).await?;
        }
    }

    Ok(())
}
