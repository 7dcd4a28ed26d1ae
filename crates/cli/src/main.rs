mod commands;
mod context;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use eventide_domain::{Config, EventDraft};
use eventide_infra::config;
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "eventide")]
#[command(about = "Discover local events, keep favorites, RSVP and chat with other attendees")]
struct Cli {
    /// Config file (JSON or TOML). Defaults to the environment, then the
    /// standard config locations.
    #[arg(long, global = true, env = "EVENTIDE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events for a city
    Events {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
    /// Show one event with its countdown
    Show { event_id: String },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// RSVP to an event
    Rsvp { event_id: String },
    /// Cancel an RSVP
    CancelRsvp { event_id: String },
    /// Flip the RSVP state of an event
    ToggleRsvp { event_id: String },
    /// Whether you are attending an event
    RsvpStatus { event_id: String },
    /// List attendees of an event
    Attendees { event_id: String },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with a Google ID token
    LoginGoogle { id_token: String },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Create the account with the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Per-event chat
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Push notification setup
    Push {
        #[command(subcommand)]
        action: PushAction,
    },
    /// Admin tools
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { event_id: String },
    Remove { event_id: String },
}

#[derive(Subcommand)]
enum ChatAction {
    Send { event_id: String, text: String },
    List { event_id: String },
}

#[derive(Subcommand)]
enum PushAction {
    /// Register this device's push token
    Register { token: String },
    /// Send the "event favorited" notification through the messaging API
    Notify {
        #[arg(long)]
        event_name: Option<String>,
        /// Defaults to the registered device token
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    CreateEvent(DraftArgs),
}

#[derive(Args)]
struct DraftArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    summary: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    category: String,
    /// YYYY-MM-DD
    #[arg(long)]
    start_date: String,
    /// HH:MM
    #[arg(long)]
    start_time: String,
    #[arg(long)]
    end_time: String,
    #[arg(long, allow_hyphen_values = true)]
    latitude: String,
    #[arg(long, allow_hyphen_values = true)]
    longitude: String,
}

impl From<DraftArgs> for EventDraft {
    fn from(args: DraftArgs) -> Self {
        Self {
            name: args.name,
            summary: args.summary,
            address: args.address,
            category: args.category,
            start_date: args.start_date,
            start_time: args.start_time,
            end_time: args.end_time,
            latitude: args.latitude,
            longitude: args.longitude,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            alert(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

// Faults reach the user as an alert carrying the raw message.
#[allow(clippy::print_stderr)]
fn alert(err: &anyhow::Error) {
    eprintln!("Alert: {err}");
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = config::load_from_file(Some(path))?;
            config::apply_secrets_from_env(&mut config);
            config
        }
        None => config::load()?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::new(load_config(cli.config)?).await?;

    match cli.command {
        Commands::Events { city, state } => commands::events::list(&ctx, city, state).await,
        Commands::Show { event_id } => commands::events::show(&ctx, &event_id).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(&ctx),
            FavoritesAction::Add { event_id } => commands::favorites::add(&ctx, &event_id).await,
            FavoritesAction::Remove { event_id } => {
                commands::favorites::remove(&ctx, &event_id).await
            }
        },
        Commands::Rsvp { event_id } => commands::rsvp::rsvp(&ctx, &event_id).await,
        Commands::CancelRsvp { event_id } => commands::rsvp::cancel(&ctx, &event_id).await,
        Commands::ToggleRsvp { event_id } => commands::rsvp::toggle(&ctx, &event_id).await,
        Commands::RsvpStatus { event_id } => commands::rsvp::status(&ctx, &event_id).await,
        Commands::Attendees { event_id } => commands::rsvp::attendees(&ctx, &event_id).await,
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, &password).await
        }
        Commands::LoginGoogle { id_token } => commands::account::login_google(&ctx, &id_token).await,
        Commands::Signup { email, password, admin } => {
            commands::account::signup(&ctx, &email, &password, admin).await
        }
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::Whoami => commands::account::whoami(&ctx).await,
        Commands::Chat { action } => match action {
            ChatAction::Send { event_id, text } => {
                commands::chat::send(&ctx, &event_id, &text).await
            }
            ChatAction::List { event_id } => commands::chat::list(&ctx, &event_id).await,
        },
        Commands::Push { action } => match action {
            PushAction::Register { token } => commands::push::register(&ctx, &token).await,
            PushAction::Notify { event_name, token } => {
                commands::push::notify(&ctx, event_name, token).await
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::CreateEvent(args) => {
                commands::admin::create_event(&ctx, args.into()).await
            }
        },
    }
}
